//! Ionospheric bounds from solar geometry
//!
//! foF2 follows a Chapman-layer law by day and an exponential decay toward a
//! residual floor by night, scaled by a seasonal term peaking at day 80 and a
//! solar-cycle multiplier. MUF, OWF and LUF are fixed fractions / offsets.
//!
//! ```text
//! day:    foF2_base = 12 · cos(χ)^¼
//! night:  foF2_base = 4 + 2 · exp(-(χ - 90) / 30)
//! foF2  = foF2_base · (1 + 0.2 · cos(2π (doy - 80) / 365)) · solar_cycle
//! MUF   = 0.95 · foF2
//! OWF   = 0.85 · MUF
//! LUF   = 2 + cos(χ)  (day),  2  (night)
//! ```

use crate::guards::non_negative_root;
use crate::solar::SolarPosition;
use crate::{GeoPoint, Instant, ModelConfig, ModelError, Result, Site};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Subsolar daytime foF2 (MHz)
pub const CHAPMAN_PEAK_MHZ: f64 = 12.0;
pub const CHAPMAN_EXPONENT: f64 = 0.25;

/// Night foF2 residual floor and decaying excess (MHz)
pub const NIGHT_FLOOR_MHZ: f64 = 4.0;
pub const NIGHT_EXCESS_MHZ: f64 = 2.0;
/// e-folding of the night excess in zenith degrees past the horizon
pub const NIGHT_DECAY_DEG: f64 = 30.0;

pub const SEASONAL_AMPLITUDE: f64 = 0.2;
pub const SEASONAL_PEAK_DAY: f64 = 80.0;

/// MUF de-rating for practical near-vertical incidence
pub const MUF_DERATING: f64 = 0.95;
/// OWF as a fraction of MUF
pub const OWF_FRACTION: f64 = 0.85;

/// Absorption floor (MHz) and its daytime rise at the subsolar point
pub const LUF_FLOOR_MHZ: f64 = 2.0;
pub const LUF_DAYTIME_RISE_MHZ: f64 = 1.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// Ionospheric parameters for one site and instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IonosphericState {
    pub instant: Instant,
    pub solar_zenith_deg: f64,
    pub fof2_mhz: f64,
    pub muf_mhz: f64,
    pub owf_mhz: f64,
    pub luf_mhz: f64,
}

/// Where `0 ≤ LUF ≤ OWF ≤ MUF` breaks, if it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundOrdering {
    Ordered,
    NegativeLuf,
    LufAboveOwf,
    OwfAboveMuf,
}

impl IonosphericState {
    pub fn is_daytime(&self) -> bool {
        self.solar_zenith_deg < 90.0
    }

    pub fn ordering(&self) -> BoundOrdering {
        if self.luf_mhz < 0.0 {
            BoundOrdering::NegativeLuf
        } else if self.luf_mhz > self.owf_mhz {
            BoundOrdering::LufAboveOwf
        } else if self.owf_mhz > self.muf_mhz {
            BoundOrdering::OwfAboveMuf
        } else {
            BoundOrdering::Ordered
        }
    }

    /// Strict variant of [`ordering`](Self::ordering)
    pub fn validate(&self) -> Result<()> {
        match self.ordering() {
            BoundOrdering::Ordered => Ok(()),
            _ => Err(ModelError::BoundOrdering {
                luf: self.luf_mhz,
                owf: self.owf_mhz,
                muf: self.muf_mhz,
            }),
        }
    }

    /// Width of the usable window `MUF - LUF`, zero when inverted
    pub fn usable_span_mhz(&self) -> f64 {
        (self.muf_mhz - self.luf_mhz).max(0.0)
    }
}

/// Base foF2 before seasonal and solar-cycle scaling (MHz)
pub fn fof2_base_mhz(zenith_deg: f64) -> f64 {
    if zenith_deg < 90.0 {
        let cos_zenith = zenith_deg.to_radians().cos();
        CHAPMAN_PEAK_MHZ * non_negative_root(cos_zenith, CHAPMAN_EXPONENT)
    } else {
        NIGHT_FLOOR_MHZ + NIGHT_EXCESS_MHZ * (-(zenith_deg - 90.0) / NIGHT_DECAY_DEG).exp()
    }
}

/// Seasonal multiplier on foF2, peaking at day 80
pub fn seasonal_factor(day_of_year: u32) -> f64 {
    let phase = 2.0 * PI * (day_of_year as f64 - SEASONAL_PEAK_DAY) / DAYS_PER_YEAR;
    1.0 + SEASONAL_AMPLITUDE * phase.cos()
}

/// Lowest usable frequency (MHz)
pub fn lowest_usable_mhz(zenith_deg: f64) -> f64 {
    if zenith_deg < 90.0 {
        LUF_FLOOR_MHZ + LUF_DAYTIME_RISE_MHZ * zenith_deg.to_radians().cos()
    } else {
        LUF_FLOOR_MHZ
    }
}

/// Derives [`IonosphericState`]s for a site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IonosphericModel {
    solar_cycle_factor: f64,
}

impl Default for IonosphericModel {
    fn default() -> Self {
        Self {
            solar_cycle_factor: crate::MODERATE_SOLAR_CYCLE,
        }
    }
}

impl IonosphericModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            solar_cycle_factor: config.solar_cycle_factor,
        }
    }

    pub fn solar_cycle_factor(&self) -> f64 {
        self.solar_cycle_factor
    }

    pub fn derive(&self, location: &GeoPoint, instant: &Instant) -> IonosphericState {
        let sun = SolarPosition::compute(location, instant);
        let zenith = sun.zenith_deg;

        let fof2 = fof2_base_mhz(zenith) * seasonal_factor(sun.day_of_year) * self.solar_cycle_factor;
        let muf = fof2 * MUF_DERATING;
        let owf = muf * OWF_FRACTION;
        let luf = lowest_usable_mhz(zenith);

        let state = IonosphericState {
            instant: *instant,
            solar_zenith_deg: zenith,
            fof2_mhz: fof2,
            muf_mhz: muf,
            owf_mhz: owf,
            luf_mhz: luf,
        };

        let ordering = state.ordering();
        if ordering != BoundOrdering::Ordered {
            debug!(
                "{:?} at {} (zenith={:.2}°, LUF={:.3}, OWF={:.3}, MUF={:.3})",
                ordering, instant, zenith, luf, owf, muf
            );
        }

        state
    }

    /// One state per local hour of `day`, in the order given
    pub fn day_states(&self, site: &Site, day: NaiveDate, hours: &[u32]) -> Result<Vec<IonosphericState>> {
        hours
            .iter()
            .map(|&hour| {
                let instant = site.local_instant(day, hour)?;
                Ok(self.derive(&site.location, &instant))
            })
            .collect()
    }
}
