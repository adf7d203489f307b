//! Solar geometry
//!
//! Zenith angle from the textbook declination approximation and the local
//! clock hour angle. Local wall-clock time stands in for apparent solar time,
//! so longitude does not enter the result.

use crate::guards::clamp_cosine;
use crate::{GeoPoint, Instant};
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// Amplitude of the declination sinusoid (degrees)
pub const DECLINATION_AMPLITUDE_DEG: f64 = 23.45;

/// Day offset that puts zero declination at the March equinox
const DECLINATION_PHASE_DAYS: f64 = 284.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// Earth rotation rate (degrees per hour)
const DEGREES_PER_HOUR: f64 = 15.0;

/// Sun position relative to a site at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    pub day_of_year: u32,
    pub declination_deg: f64,
    pub hour_angle_deg: f64,
    pub zenith_deg: f64,
}

impl SolarPosition {
    pub fn compute(location: &GeoPoint, instant: &Instant) -> Self {
        let day_of_year = instant.ordinal();
        let declination_deg = declination_deg(day_of_year);
        let hour_angle_deg = hour_angle_deg(instant);

        let lat = location.latitude_deg().to_radians();
        let decl = declination_deg.to_radians();
        let ha = hour_angle_deg.to_radians();

        let cos_zenith = lat.sin() * decl.sin() + lat.cos() * decl.cos() * ha.cos();
        let zenith_deg = clamp_cosine(cos_zenith).acos().to_degrees();

        Self {
            day_of_year,
            declination_deg,
            hour_angle_deg,
            zenith_deg,
        }
    }

    /// Sun above the horizon
    pub fn is_daytime(&self) -> bool {
        self.zenith_deg < 90.0
    }
}

/// Solar declination for a day of year (degrees)
pub fn declination_deg(day_of_year: u32) -> f64 {
    let phase = 360.0 * (DECLINATION_PHASE_DAYS + day_of_year as f64) / DAYS_PER_YEAR;
    DECLINATION_AMPLITUDE_DEG * phase.to_radians().sin()
}

/// Hour angle from the local clock; zero at 12:00, positive in the afternoon
pub fn hour_angle_deg(instant: &Instant) -> f64 {
    let hours = instant.hour() as f64 + instant.minute() as f64 / 60.0;
    DEGREES_PER_HOUR * (hours - 12.0)
}

/// Solar zenith angle in degrees, always within `[0, 180]`.
pub fn zenith_angle(location: &GeoPoint, instant: &Instant) -> f64 {
    SolarPosition::compute(location, instant).zenith_deg
}
