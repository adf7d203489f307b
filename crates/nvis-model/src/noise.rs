//! Short-term variability sources
//!
//! The signal model perturbs every prediction with zero-mean noise. The source
//! is injected so production runs draw from entropy, reproducible runs from a
//! seed, and tests from [`Silent`] or [`Constant`].

use crate::{ModelError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Additive noise in dB
pub trait NoiseSource: Send {
    fn sample(&mut self) -> f64;

    /// Independent stream derived from this one.
    ///
    /// Splitting advances `self`, so a sequence of splits from the same seed
    /// is itself reproducible.
    fn split(&mut self) -> Self
    where
        Self: Sized;
}

/// Zero-mean Gaussian noise
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
    distribution: Normal<f64>,
    sigma_db: f64,
}

impl GaussianNoise {
    pub fn seeded(sigma_db: f64, seed: u64) -> Result<Self> {
        Self::with_rng(sigma_db, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(sigma_db: f64) -> Result<Self> {
        Self::with_rng(sigma_db, StdRng::from_entropy())
    }

    fn with_rng(sigma_db: f64, rng: StdRng) -> Result<Self> {
        if !sigma_db.is_finite() || sigma_db < 0.0 {
            return Err(ModelError::InvalidNoise(format!(
                "sigma must be finite and non-negative, got {}",
                sigma_db
            )));
        }
        let distribution =
            Normal::new(0.0, sigma_db).map_err(|e| ModelError::InvalidNoise(e.to_string()))?;

        Ok(Self {
            rng,
            distribution,
            sigma_db,
        })
    }

    pub fn sigma_db(&self) -> f64 {
        self.sigma_db
    }
}

impl NoiseSource for GaussianNoise {
    fn sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }

    fn split(&mut self) -> Self {
        Self {
            rng: StdRng::seed_from_u64(self.rng.gen()),
            distribution: self.distribution,
            sigma_db: self.sigma_db,
        }
    }
}

/// No perturbation; predictions become a pure function of their inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Silent;

impl NoiseSource for Silent {
    fn sample(&mut self) -> f64 {
        0.0
    }

    fn split(&mut self) -> Self {
        Silent
    }
}

/// Fixed offset on every prediction (what-if margins, clamp tests)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl NoiseSource for Constant {
    fn sample(&mut self) -> f64 {
        self.0
    }

    fn split(&mut self) -> Self {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = GaussianNoise::seeded(2.0, 42).unwrap();
        let mut b = GaussianNoise::seeded(2.0, 42).unwrap();
        let xs: Vec<f64> = (0..32).map(|_| a.sample()).collect();
        let ys: Vec<f64> = (0..32).map(|_| b.sample()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = GaussianNoise::seeded(2.0, 1).unwrap();
        let mut b = GaussianNoise::seeded(2.0, 2).unwrap();
        let same = (0..32).filter(|_| a.sample() == b.sample()).count();
        assert!(same < 32);
    }

    #[test]
    fn test_sample_statistics() {
        let mut noise = GaussianNoise::seeded(2.0, 7).unwrap();
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| noise.sample()).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.1, "mean {}", mean);
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn test_split_is_deterministic() {
        let mut parent_a = GaussianNoise::seeded(2.0, 99).unwrap();
        let mut parent_b = GaussianNoise::seeded(2.0, 99).unwrap();
        let mut child_a = parent_a.split();
        let mut child_b = parent_b.split();
        assert_eq!(child_a.sample(), child_b.sample());
        assert_eq!(parent_a.sample(), parent_b.sample());
    }

    #[test]
    fn test_invalid_sigma() {
        assert!(GaussianNoise::seeded(-1.0, 0).is_err());
        assert!(GaussianNoise::seeded(f64::NAN, 0).is_err());
        assert!(GaussianNoise::from_entropy(f64::INFINITY).is_err());
        assert!(GaussianNoise::seeded(0.0, 0).is_ok());
    }

    #[test]
    fn test_silent_and_constant() {
        let mut silent = Silent;
        assert_eq!(silent.sample(), 0.0);
        assert_eq!(silent.split(), Silent);

        let mut offset = Constant(-3.5);
        assert_eq!(offset.sample(), -3.5);
        assert_eq!(offset.split().sample(), -3.5);
    }
}
