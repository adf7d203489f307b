//! NVIS Propagation Model
//!
//! Predicts Near-Vertical-Incidence Skywave conditions for a fixed site from
//! solar geometry alone, then turns the predicted ionospheric bounds into an
//! expected signal strength for any HF operating frequency.
//!
//! # Pipeline
//!
//! ```text
//! GeoPoint + Instant ─► solar ─► ionosphere ─► signal (per frequency)
//!                                      │              │
//!                                      │              ├─► grid (frequency × hour surface)
//!                                      └──────────────┴─► recommend (favorable hours + verdict)
//! ```
//!
//! | Module       | Role |
//! |--------------|------|
//! | `solar`      | Declination, hour angle, solar zenith angle |
//! | `ionosphere` | foF2, MUF, OWF, LUF from zenith and season |
//! | `noise`      | Injectable variability sources |
//! | `guards`     | Numeric domain helpers |
//! | `signal`     | Piecewise strength model with injected noise |
//! | `grid`       | Dense suitability surface over frequency × hour |
//! | `recommend`  | Per-frequency favorable hours and noon verdict |
//! | `bands`      | Amateur HF allocations and NVIS operating windows |
//! | `quality`    | foF2 quality classes and geomagnetic activity |

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod bands;
pub mod grid;
pub mod guards;
pub mod ionosphere;
pub mod noise;
pub mod quality;
pub mod recommend;
pub mod signal;
pub mod solar;

pub use grid::{frequency_samples, SuitabilityGrid, SuitabilitySurface};
pub use ionosphere::{BoundOrdering, IonosphericModel, IonosphericState};
pub use noise::{Constant, GaussianNoise, NoiseSource, Silent};
pub use recommend::{Recommendation, RecommendationEngine, Verdict};
pub use signal::{Region, SignalPrediction, SignalPredictor};
pub use solar::{zenith_angle, SolarPosition};

/// Timezone-aware instant in the site's local offset.
pub type Instant = DateTime<FixedOffset>;

/// Solar-cycle multiplier for moderate activity
pub const MODERATE_SOLAR_CYCLE: f64 = 1.0;

/// Standard deviation of the short-term variability term (dB)
pub const DEFAULT_NOISE_SIGMA_DB: f64 = 2.0;

/// Predicted strength above which an hour counts as favorable (dB)
pub const DEFAULT_FAVORABLE_THRESHOLD_DB: f64 = 0.0;

/// Local hour used for the qualitative verdict
pub const DEFAULT_REFERENCE_HOUR: u32 = 12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Latitude out of range [-90, 90]: {0}")]
    InvalidLatitude(f64),
    #[error("Longitude out of range [-180, 180]: {0}")]
    InvalidLongitude(f64),
    #[error("UTC offset out of range: {0} h")]
    InvalidUtcOffset(f64),
    #[error("Frequency must be finite and positive: {0} MHz")]
    InvalidFrequency(f64),
    #[error("Frequency {frequency} MHz outside sampled range [{min}, {max}] MHz")]
    FrequencyOutOfRange { frequency: f64, min: f64, max: f64 },
    #[error("Frequency samples must be strictly ascending (index {0})")]
    UnorderedFrequencies(usize),
    #[error("Hour must be in 0..24: {0}")]
    InvalidHour(u32),
    #[error("Hours must be strictly ascending (index {0})")]
    UnorderedHours(usize),
    #[error("Empty {0} axis")]
    EmptyAxis(&'static str),
    #[error("No local time for {day} {hour:02}:00")]
    InvalidLocalTime { day: NaiveDate, hour: u32 },
    #[error("Invalid noise configuration: {0}")]
    InvalidNoise(String),
    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),
    #[error("Surface has {actual} values for a {frequencies} × {hours} grid")]
    SurfaceShape {
        frequencies: usize,
        hours: usize,
        actual: usize,
    },
    #[error("No ionospheric state for reference hour {0}")]
    MissingReferenceHour(u32),
    #[error("Usable-frequency bounds out of order: LUF={luf:.3} OWF={owf:.3} MUF={muf:.3} MHz")]
    BoundOrdering { luf: f64, owf: f64, muf: f64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl GeoPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(ModelError::InvalidLatitude(latitude_deg));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(ModelError::InvalidLongitude(longitude_deg));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }
}

/// A named site with its local clock offset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub name: String,
    pub location: GeoPoint,
    #[serde(serialize_with = "serialize_offset")]
    pub utc_offset: FixedOffset,
}

impl Site {
    pub fn new(name: impl Into<String>, location: GeoPoint, utc_offset_hours: f64) -> Result<Self> {
        if !utc_offset_hours.is_finite() {
            return Err(ModelError::InvalidUtcOffset(utc_offset_hours));
        }
        let seconds = (utc_offset_hours * 3600.0).round() as i32;
        let utc_offset = FixedOffset::east_opt(seconds)
            .ok_or(ModelError::InvalidUtcOffset(utc_offset_hours))?;

        Ok(Self {
            name: name.into(),
            location,
            utc_offset,
        })
    }

    pub fn utc_offset_hours(&self) -> f64 {
        self.utc_offset.local_minus_utc() as f64 / 3600.0
    }

    /// Local wall-clock instant at the top of `hour` on `day`
    pub fn local_instant(&self, day: NaiveDate, hour: u32) -> Result<Instant> {
        let naive = day
            .and_hms_opt(hour, 0, 0)
            .ok_or(ModelError::InvalidHour(hour))?;
        self.utc_offset
            .from_local_datetime(&naive)
            .single()
            .ok_or(ModelError::InvalidLocalTime { day, hour })
    }
}

fn serialize_offset<S: serde::Serializer>(
    offset: &FixedOffset,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&offset.to_string())
}

/// Tunables of the model; every default reproduces the reference behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Multiplier on foF2 for the solar-cycle phase
    pub solar_cycle_factor: f64,
    /// Gaussian variability standard deviation (dB)
    pub noise_sigma_db: f64,
    /// Strength above which an hour is favorable (dB)
    pub favorable_threshold_db: f64,
    /// Local hour whose state drives the verdict
    pub reference_hour: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            solar_cycle_factor: MODERATE_SOLAR_CYCLE,
            noise_sigma_db: DEFAULT_NOISE_SIGMA_DB,
            favorable_threshold_db: DEFAULT_FAVORABLE_THRESHOLD_DB,
            reference_hour: DEFAULT_REFERENCE_HOUR,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.solar_cycle_factor.is_finite() || self.solar_cycle_factor <= 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "solar_cycle_factor must be positive, got {}",
                self.solar_cycle_factor
            )));
        }
        if !self.noise_sigma_db.is_finite() || self.noise_sigma_db < 0.0 {
            return Err(ModelError::InvalidNoise(format!(
                "sigma must be finite and non-negative, got {}",
                self.noise_sigma_db
            )));
        }
        if !self.favorable_threshold_db.is_finite() {
            return Err(ModelError::InvalidConfig(format!(
                "favorable_threshold_db must be finite, got {}",
                self.favorable_threshold_db
            )));
        }
        if self.reference_hour >= grid::HOURS_PER_DAY {
            return Err(ModelError::InvalidHour(self.reference_hour));
        }
        Ok(())
    }
}
