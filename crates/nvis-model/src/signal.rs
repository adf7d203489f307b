//! Per-frequency signal strength
//!
//! Piecewise model over the usable window of an [`IonosphericState`]. The
//! branches are tested in this order:
//!
//! | Region        | Condition              | Strength (dB) |
//! |---------------|------------------------|---------------|
//! | `BelowLuf`    | f < LUF                | -20 - 10·(LUF - f) |
//! | `AboveMuf`    | f > MUF                | -30 - 5·(f - MUF) |
//! | `NearOptimum` | LUF ≤ f ≤ OWF          | 10 - 5·\|f - OWF\| / OWF |
//! | `Degrading`   | OWF < f ≤ MUF          | 5 - 15·(f - OWF) / (MUF - OWF) |
//!
//! Noise is added to the base value and the sum is clamped to [-40, +20] dB.

use crate::guards::safe_ratio;
use crate::ionosphere::IonosphericState;
use crate::noise::NoiseSource;
use crate::{Instant, ModelError, Result};
use serde::{Deserialize, Serialize};

pub const ABSORPTION_BASE_DB: f64 = -20.0;
pub const ABSORPTION_SLOPE_DB_PER_MHZ: f64 = 10.0;

pub const ESCAPE_BASE_DB: f64 = -30.0;
pub const ESCAPE_SLOPE_DB_PER_MHZ: f64 = 5.0;

pub const OPTIMUM_PEAK_DB: f64 = 10.0;
pub const OPTIMUM_SPREAD_DB: f64 = 5.0;

pub const DEGRADING_START_DB: f64 = 5.0;
pub const DEGRADING_SPAN_DB: f64 = 15.0;

pub const MIN_STRENGTH_DB: f64 = -40.0;
pub const MAX_STRENGTH_DB: f64 = 20.0;

/// Position of a frequency relative to `[LUF, OWF, MUF]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    BelowLuf,
    AboveMuf,
    NearOptimum,
    Degrading,
}

impl Region {
    pub fn of(frequency_mhz: f64, state: &IonosphericState) -> Self {
        if frequency_mhz < state.luf_mhz {
            Region::BelowLuf
        } else if frequency_mhz > state.muf_mhz {
            Region::AboveMuf
        } else if frequency_mhz <= state.owf_mhz {
            Region::NearOptimum
        } else {
            Region::Degrading
        }
    }
}

/// Noise-free strength for `frequency_mhz` (dB, unclamped)
pub fn base_strength_db(frequency_mhz: f64, state: &IonosphericState) -> f64 {
    match Region::of(frequency_mhz, state) {
        Region::BelowLuf => {
            ABSORPTION_BASE_DB - ABSORPTION_SLOPE_DB_PER_MHZ * (state.luf_mhz - frequency_mhz)
        }
        Region::AboveMuf => {
            ESCAPE_BASE_DB - ESCAPE_SLOPE_DB_PER_MHZ * (frequency_mhz - state.muf_mhz)
        }
        Region::NearOptimum => {
            OPTIMUM_PEAK_DB
                - OPTIMUM_SPREAD_DB * safe_ratio((frequency_mhz - state.owf_mhz).abs(), state.owf_mhz)
        }
        Region::Degrading => degrading_strength_db(frequency_mhz, state.owf_mhz, state.muf_mhz),
    }
}

/// OWF-to-MUF branch; a collapsed `MUF == OWF` interval has no penalty.
pub fn degrading_strength_db(frequency_mhz: f64, owf_mhz: f64, muf_mhz: f64) -> f64 {
    DEGRADING_START_DB
        - DEGRADING_SPAN_DB * safe_ratio(frequency_mhz - owf_mhz, muf_mhz - owf_mhz)
}

pub fn clamp_strength(strength_db: f64) -> f64 {
    strength_db.clamp(MIN_STRENGTH_DB, MAX_STRENGTH_DB)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalPrediction {
    pub frequency_mhz: f64,
    pub instant: Instant,
    pub strength_db: f64,
    pub region: Region,
}

/// Signal-strength predictor with an injected noise source
#[derive(Debug, Clone)]
pub struct SignalPredictor<N> {
    noise: N,
}

impl<N: NoiseSource> SignalPredictor<N> {
    pub fn new(noise: N) -> Self {
        Self { noise }
    }

    pub fn predict(&mut self, frequency_mhz: f64, state: &IonosphericState) -> Result<SignalPrediction> {
        let strength_db = self.strength_db(frequency_mhz, state)?;
        Ok(SignalPrediction {
            frequency_mhz,
            instant: state.instant,
            strength_db,
            region: Region::of(frequency_mhz, state),
        })
    }

    /// Clamped strength including noise (dB)
    pub fn strength_db(&mut self, frequency_mhz: f64, state: &IonosphericState) -> Result<f64> {
        if !frequency_mhz.is_finite() || frequency_mhz <= 0.0 {
            return Err(ModelError::InvalidFrequency(frequency_mhz));
        }
        let raw = base_strength_db(frequency_mhz, state) + self.noise.sample();
        Ok(clamp_strength(raw))
    }

    /// Predictor over an independent noise stream
    pub fn split(&mut self) -> Self {
        Self {
            noise: self.noise.split(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{Constant, GaussianNoise, Silent};
    use chrono::{FixedOffset, TimeZone};

    fn state(luf: f64, owf: f64, muf: f64) -> IonosphericState {
        IonosphericState {
            instant: FixedOffset::east_opt(8 * 3600)
                .unwrap()
                .with_ymd_and_hms(2023, 4, 18, 12, 0, 0)
                .unwrap(),
            solar_zenith_deg: 5.1,
            fof2_mhz: muf / 0.95,
            muf_mhz: muf,
            owf_mhz: owf,
            luf_mhz: luf,
        }
    }

    #[test]
    fn test_four_branches_without_noise() {
        let s = state(2.0, 8.5, 10.0);
        let mut predictor = SignalPredictor::new(Silent);

        // Below LUF: -20 - 10·(2 - 1)
        let p = predictor.predict(1.0, &s).unwrap();
        assert_eq!(p.region, Region::BelowLuf);
        assert!((p.strength_db - (-30.0)).abs() < 1e-12);

        // Above MUF: -30 - 5·(12 - 10)
        let p = predictor.predict(12.0, &s).unwrap();
        assert_eq!(p.region, Region::AboveMuf);
        assert!((p.strength_db - (-40.0)).abs() < 1e-12);

        // Near optimum: 10 - 5·|5 - 8.5| / 8.5
        let p = predictor.predict(5.0, &s).unwrap();
        assert_eq!(p.region, Region::NearOptimum);
        assert!((p.strength_db - (10.0 - 5.0 * 3.5 / 8.5)).abs() < 1e-12);

        // Degrading: 5 - 15·(9 - 8.5) / (10 - 8.5)
        let p = predictor.predict(9.0, &s).unwrap();
        assert_eq!(p.region, Region::Degrading);
        assert!((p.strength_db - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_region_boundaries() {
        let s = state(2.0, 8.5, 10.0);
        assert_eq!(Region::of(2.0, &s), Region::NearOptimum);
        assert_eq!(Region::of(8.5, &s), Region::NearOptimum);
        assert_eq!(Region::of(10.0, &s), Region::Degrading);
        assert_eq!(Region::of(10.0 + 1e-9, &s), Region::AboveMuf);
        assert!((base_strength_db(8.5, &s) - 10.0).abs() < 1e-12);
        assert!((base_strength_db(10.0, &s) - (-10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_division_guard_collapsed_interval() {
        let value = degrading_strength_db(8.5, 8.5, 8.5);
        assert_eq!(value, DEGRADING_START_DB);

        let value = degrading_strength_db(8.6, 8.5, 8.5);
        assert!(value.is_finite());
        assert_eq!(value, DEGRADING_START_DB);

        let s = state(2.0, 8.5, 8.5);
        let mut predictor = SignalPredictor::new(Silent);
        for f in [1.0, 2.0, 8.5, 8.5 + 1e-12, 15.0] {
            assert!(predictor.strength_db(f, &s).unwrap().is_finite());
        }
    }

    #[test]
    fn test_zero_owf_guard() {
        let s = state(0.0, 0.0, 0.0);
        let mut predictor = SignalPredictor::new(Silent);
        assert!(predictor.strength_db(1e-6, &s).unwrap().is_finite());
    }

    #[test]
    fn test_clamp_under_extreme_noise() {
        let s = state(2.0, 8.5, 10.0);

        let mut up = SignalPredictor::new(Constant(1_000.0));
        assert_eq!(up.strength_db(5.0, &s).unwrap(), MAX_STRENGTH_DB);

        let mut down = SignalPredictor::new(Constant(-1_000.0));
        assert_eq!(down.strength_db(5.0, &s).unwrap(), MIN_STRENGTH_DB);

        // Far above MUF the raw value is well below -40
        let mut silent = SignalPredictor::new(Silent);
        assert_eq!(silent.strength_db(19.0, &s).unwrap(), MIN_STRENGTH_DB);

        let mut noisy = SignalPredictor::new(GaussianNoise::seeded(25.0, 3).unwrap());
        for _ in 0..500 {
            let v = noisy.strength_db(7.0, &s).unwrap();
            assert!((MIN_STRENGTH_DB..=MAX_STRENGTH_DB).contains(&v));
        }
    }

    #[test]
    fn test_invalid_frequency() {
        let s = state(2.0, 8.5, 10.0);
        let mut predictor = SignalPredictor::new(Silent);
        assert_eq!(
            predictor.predict(0.0, &s),
            Err(ModelError::InvalidFrequency(0.0))
        );
        assert!(predictor.predict(f64::NAN, &s).is_err());
        assert!(predictor.predict(-3.0, &s).is_err());
    }

    #[test]
    fn test_inverted_bounds_stay_finite() {
        // LUF above OWF and MUF, as right after sunrise
        let s = state(2.0, 1.1, 1.3);
        let mut predictor = SignalPredictor::new(Silent);
        assert_eq!(Region::of(1.5, &s), Region::BelowLuf);
        assert_eq!(Region::of(2.5, &s), Region::AboveMuf);
        for f in [0.5, 1.2, 2.0, 5.0] {
            assert!(predictor.strength_db(f, &s).unwrap().is_finite());
        }
    }
}
