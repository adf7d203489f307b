//! Per-frequency operating recommendations
//!
//! For one frequency, a full day of [`IonosphericState`]s is scored hour by
//! hour; hours above the favorable threshold are collected and the reference
//! hour's bounds give a qualitative verdict.

use crate::ionosphere::IonosphericState;
use crate::noise::NoiseSource;
use crate::signal::{Region, SignalPredictor};
use crate::{ModelConfig, ModelError, Result};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    AbsorptionLimited,
    PenetratesIonosphere,
    Excellent,
    UsableButSuboptimal,
}

impl Verdict {
    /// Same precedence as the signal model: absorption, escape, then in-band.
    pub fn classify(frequency_mhz: f64, state: &IonosphericState) -> Self {
        match Region::of(frequency_mhz, state) {
            Region::BelowLuf => Verdict::AbsorptionLimited,
            Region::AboveMuf => Verdict::PenetratesIonosphere,
            Region::NearOptimum => Verdict::Excellent,
            Region::Degrading => Verdict::UsableButSuboptimal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::AbsorptionLimited => "absorption-limited",
            Verdict::PenetratesIonosphere => "penetrates-ionosphere / no NVIS",
            Verdict::Excellent => "excellent",
            Verdict::UsableButSuboptimal => "usable-but-suboptimal",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub frequency_mhz: f64,
    pub favorable_hours: BTreeSet<u32>,
    pub verdict: Verdict,
    pub reference_hour: u32,
    pub hours_evaluated: usize,
}

impl Recommendation {
    pub fn is_favorable_at(&self, hour: u32) -> bool {
        self.favorable_hours.contains(&hour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationEngine {
    favorable_threshold_db: f64,
    reference_hour: u32,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(&ModelConfig::default())
    }
}

impl RecommendationEngine {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            favorable_threshold_db: config.favorable_threshold_db,
            reference_hour: config.reference_hour,
        }
    }

    pub fn recommend<N: NoiseSource>(
        &self,
        frequency_mhz: f64,
        day_states: &[IonosphericState],
        predictor: &mut SignalPredictor<N>,
    ) -> Result<Recommendation> {
        if day_states.is_empty() {
            return Err(ModelError::EmptyAxis("hour"));
        }

        let reference = day_states
            .iter()
            .find(|state| state.instant.hour() == self.reference_hour)
            .ok_or(ModelError::MissingReferenceHour(self.reference_hour))?;

        let mut favorable_hours = BTreeSet::new();
        for state in day_states {
            let strength_db = predictor.strength_db(frequency_mhz, state)?;
            if strength_db > self.favorable_threshold_db {
                favorable_hours.insert(state.instant.hour());
            }
        }

        let verdict = Verdict::classify(frequency_mhz, reference);
        debug!(
            "{:.3} MHz: {} favorable hours, verdict {}",
            frequency_mhz,
            favorable_hours.len(),
            verdict
        );

        Ok(Recommendation {
            frequency_mhz,
            favorable_hours,
            verdict,
            reference_hour: self.reference_hour,
            hours_evaluated: day_states.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::all_hours;
    use crate::ionosphere::IonosphericModel;
    use crate::noise::{Constant, GaussianNoise, Silent};
    use crate::{GeoPoint, Site};
    use chrono::NaiveDate;

    fn dgfc_day() -> (Site, Vec<IonosphericState>) {
        let site = Site::new("DGFC", GeoPoint::new(5.4139, 118.0385).unwrap(), 8.0).unwrap();
        let day = NaiveDate::from_ymd_opt(2023, 4, 18).unwrap();
        let states = IonosphericModel::default()
            .day_states(&site, day, &all_hours())
            .unwrap();
        (site, states)
    }

    #[test]
    fn test_dgfc_40m_is_excellent() {
        let (_, states) = dgfc_day();
        let noon = &states[12];
        assert!(noon.is_daytime());
        assert!(noon.solar_zenith_deg < 90.0);
        assert!(noon.luf_mhz <= 7.078 && 7.078 <= noon.owf_mhz);

        let engine = RecommendationEngine::default();
        let mut predictor = SignalPredictor::new(GaussianNoise::seeded(2.0, 42).unwrap());
        let rec = engine.recommend(7.078, &states, &mut predictor).unwrap();

        assert_eq!(rec.verdict, Verdict::Excellent);
        assert_eq!(rec.verdict.to_string(), "excellent");
        assert_eq!(rec.reference_hour, 12);
        assert_eq!(rec.hours_evaluated, 24);
    }

    #[test]
    fn test_verdict_classes() {
        let (_, states) = dgfc_day();
        let noon = &states[12];

        assert_eq!(Verdict::classify(1.0, noon), Verdict::AbsorptionLimited);
        assert_eq!(Verdict::classify(19.0, noon), Verdict::PenetratesIonosphere);
        assert_eq!(Verdict::classify(noon.owf_mhz, noon), Verdict::Excellent);
        let between = (noon.owf_mhz + noon.muf_mhz) / 2.0;
        assert_eq!(Verdict::classify(between, noon), Verdict::UsableButSuboptimal);
    }

    #[test]
    fn test_favorable_hours_without_noise() {
        let (_, states) = dgfc_day();
        let engine = RecommendationEngine::default();
        let mut predictor = SignalPredictor::new(Silent);
        let rec = engine.recommend(7.078, &states, &mut predictor).unwrap();

        assert!(rec.is_favorable_at(12));
        for state in &states {
            let hour = state.instant.hour();
            let expected = crate::signal::base_strength_db(7.078, state) > 0.0;
            assert_eq!(rec.is_favorable_at(hour), expected, "hour {}", hour);
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let (_, states) = dgfc_day();
        let engine = RecommendationEngine::new(&ModelConfig {
            favorable_threshold_db: 100.0,
            ..ModelConfig::default()
        });
        let rec = engine
            .recommend(7.078, &states, &mut SignalPredictor::new(Constant(1_000.0)))
            .unwrap();
        // Clamped at +20 dB, never above a 100 dB threshold
        assert!(rec.favorable_hours.is_empty());
    }

    #[test]
    fn test_missing_reference_hour() {
        let (_, states) = dgfc_day();
        let engine = RecommendationEngine::default();
        let mut predictor = SignalPredictor::new(Silent);

        assert_eq!(
            engine.recommend(7.078, &states[..6], &mut predictor),
            Err(ModelError::MissingReferenceHour(12))
        );
        assert_eq!(
            engine.recommend(7.078, &[], &mut predictor),
            Err(ModelError::EmptyAxis("hour"))
        );
    }

    #[test]
    fn test_verdict_serializes_kebab_case() {
        let json = serde_json::to_string(&Verdict::UsableButSuboptimal).unwrap();
        assert_eq!(json, "\"usable-but-suboptimal\"");
        assert_eq!(
            Verdict::PenetratesIonosphere.label(),
            "penetrates-ionosphere / no NVIS"
        );
    }
}
