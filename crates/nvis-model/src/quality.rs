//! Critical-frequency quality assessment
//!
//! A quick check of an operating frequency against a measured or predicted
//! foF2, independent of the hourly signal model:
//!
//! ```text
//! MUF         = foF2 / cos(incidence)      (incidence from vertical)
//! nvis_factor = f / (0.85 · MUF)
//! ```
//!
//! | nvis_factor | Class     | Expected SNR |
//! |-------------|-----------|--------------|
//! | < 0.5       | Excellent | +10 dB       |
//! | < 0.8       | Good      | +5 dB        |
//! | < 1.0       | Fair      | 0 dB         |
//! | otherwise   | Poor      | -10 dB       |

use crate::ionosphere::OWF_FRACTION;
use crate::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Factor reported when no MUF is available
pub const UNREACHABLE_FACTOR: f64 = 999.0;

/// Incidence beyond which the secant law is not applied (degrees)
pub const MAX_INCIDENCE_DEG: f64 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityClass {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityClass {
    pub fn from_factor(nvis_factor: f64) -> Self {
        if nvis_factor < 0.5 {
            QualityClass::Excellent
        } else if nvis_factor < 0.8 {
            QualityClass::Good
        } else if nvis_factor < 1.0 {
            QualityClass::Fair
        } else {
            QualityClass::Poor
        }
    }

    pub fn expected_snr_db(&self) -> f64 {
        match self {
            QualityClass::Excellent => 10.0,
            QualityClass::Good => 5.0,
            QualityClass::Fair => 0.0,
            QualityClass::Poor => -10.0,
        }
    }
}

impl fmt::Display for QualityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualityClass::Excellent => "Excellent",
            QualityClass::Good => "Good",
            QualityClass::Fair => "Fair",
            QualityClass::Poor => "Poor/Impossible",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub frequency_mhz: f64,
    pub fof2_mhz: f64,
    pub muf_mhz: f64,
    pub nvis_factor: f64,
    pub class: QualityClass,
    pub expected_snr_db: f64,
}

/// Assess `frequency_mhz` against `fof2_mhz` at `incidence_deg` from vertical.
pub fn assess(frequency_mhz: f64, fof2_mhz: f64, incidence_deg: f64) -> Result<QualityAssessment> {
    if !frequency_mhz.is_finite() || frequency_mhz <= 0.0 {
        return Err(ModelError::InvalidFrequency(frequency_mhz));
    }
    if !fof2_mhz.is_finite() {
        return Err(ModelError::InvalidFrequency(fof2_mhz));
    }
    if !incidence_deg.is_finite() || !(0.0..=MAX_INCIDENCE_DEG).contains(&incidence_deg) {
        return Err(ModelError::InvalidConfig(format!(
            "incidence must be within [0, {}] degrees, got {}",
            MAX_INCIDENCE_DEG, incidence_deg
        )));
    }

    let muf_mhz = fof2_mhz / incidence_deg.to_radians().cos();
    let nvis_factor = if muf_mhz > 0.0 {
        frequency_mhz / (OWF_FRACTION * muf_mhz)
    } else {
        UNREACHABLE_FACTOR
    };
    let class = QualityClass::from_factor(nvis_factor);

    Ok(QualityAssessment {
        frequency_mhz,
        fof2_mhz,
        muf_mhz,
        nvis_factor,
        class,
        expected_snr_db: class.expected_snr_db(),
    })
}

/// Planetary K-index classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeomagneticActivity {
    Quiet,
    Unsettled,
    Active,
    Disturbed,
}

/// Kp above which NVIS paths are expected to suffer
pub const NVIS_DISRUPTION_KP: f64 = 4.0;

impl GeomagneticActivity {
    pub fn from_kp(kp: f64) -> Self {
        if kp <= 2.0 {
            GeomagneticActivity::Quiet
        } else if kp <= 4.0 {
            GeomagneticActivity::Unsettled
        } else if kp <= 6.0 {
            GeomagneticActivity::Active
        } else {
            GeomagneticActivity::Disturbed
        }
    }

    pub fn disrupts_nvis(kp: f64) -> bool {
        kp > NVIS_DISRUPTION_KP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_incidence_muf_is_fof2() {
        let a = assess(7.078, 14.0, 0.0).unwrap();
        assert_eq!(a.muf_mhz, 14.0);
        assert!((a.nvis_factor - 7.078 / (0.85 * 14.0)).abs() < 1e-12);
        assert_eq!(a.class, QualityClass::Good);
        assert_eq!(a.expected_snr_db, 5.0);
    }

    #[test]
    fn test_secant_law_raises_muf() {
        let vertical = assess(10.0, 8.0, 0.0).unwrap();
        let oblique = assess(10.0, 8.0, 60.0).unwrap();
        assert!((oblique.muf_mhz - 16.0).abs() < 1e-9);
        assert!(oblique.nvis_factor < vertical.nvis_factor);
        assert!(oblique.class > vertical.class);
    }

    #[test]
    fn test_quality_classes() {
        assert_eq!(QualityClass::from_factor(0.3), QualityClass::Excellent);
        assert_eq!(QualityClass::from_factor(0.5), QualityClass::Good);
        assert_eq!(QualityClass::from_factor(0.79), QualityClass::Good);
        assert_eq!(QualityClass::from_factor(0.8), QualityClass::Fair);
        assert_eq!(QualityClass::from_factor(1.0), QualityClass::Poor);
        assert_eq!(QualityClass::Poor.to_string(), "Poor/Impossible");
        assert_eq!(QualityClass::Poor.expected_snr_db(), -10.0);
    }

    #[test]
    fn test_no_muf_is_unreachable() {
        let a = assess(3.0, 0.0, 0.0).unwrap();
        assert_eq!(a.nvis_factor, UNREACHABLE_FACTOR);
        assert_eq!(a.class, QualityClass::Poor);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            assess(0.0, 8.0, 0.0),
            Err(ModelError::InvalidFrequency(_))
        ));
        assert!(assess(7.0, f64::NAN, 0.0).is_err());
        assert!(assess(7.0, 8.0, 90.0).is_err());
        assert!(assess(7.0, 8.0, -1.0).is_err());
    }

    #[test]
    fn test_geomagnetic_classes() {
        assert_eq!(GeomagneticActivity::from_kp(0.0), GeomagneticActivity::Quiet);
        assert_eq!(GeomagneticActivity::from_kp(2.0), GeomagneticActivity::Quiet);
        assert_eq!(GeomagneticActivity::from_kp(3.3), GeomagneticActivity::Unsettled);
        assert_eq!(GeomagneticActivity::from_kp(4.0), GeomagneticActivity::Unsettled);
        assert_eq!(GeomagneticActivity::from_kp(5.7), GeomagneticActivity::Active);
        assert_eq!(GeomagneticActivity::from_kp(8.0), GeomagneticActivity::Disturbed);

        assert!(!GeomagneticActivity::disrupts_nvis(4.0));
        assert!(GeomagneticActivity::disrupts_nvis(4.3));
    }
}
