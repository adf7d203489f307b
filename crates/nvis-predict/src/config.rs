//! Site and model configuration from JSON files
//!
//! ```json
//! {
//!   "site": {"name": "DGFC", "latitude_deg": 5.4139, "longitude_deg": 118.0385, "utc_offset_hours": 8.0},
//!   "model": {"solar_cycle_factor": 1.2, "noise_sigma_db": 2.0}
//! }
//! ```
//!
//! Both sections are optional; a missing section keeps its defaults, a
//! missing model field keeps its default value.

use crate::{
    ConfigError, Result, DEFAULT_LATITUDE_DEG, DEFAULT_LONGITUDE_DEG, DEFAULT_SITE_NAME,
    DEFAULT_UTC_OFFSET_HOURS,
};
use nvis_model::{GeoPoint, ModelConfig, Site};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Sanitize site name (printable, limited length)
fn sanitize_name(name: String) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || " -_.,()&'/".contains(*c))
        .take(128)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub utc_offset_hours: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SITE_NAME.to_string(),
            latitude_deg: DEFAULT_LATITUDE_DEG,
            longitude_deg: DEFAULT_LONGITUDE_DEG,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl SiteConfig {
    /// Apply command-line overrides on top of file or default values
    pub fn with_overrides(
        mut self,
        name: Option<String>,
        latitude_deg: Option<f64>,
        longitude_deg: Option<f64>,
        utc_offset_hours: Option<f64>,
    ) -> Self {
        if let Some(name) = name {
            self.name = sanitize_name(name);
        }
        if let Some(lat) = latitude_deg {
            self.latitude_deg = lat;
        }
        if let Some(lon) = longitude_deg {
            self.longitude_deg = lon;
        }
        if let Some(offset) = utc_offset_hours {
            self.utc_offset_hours = offset;
        }
        self
    }

    pub fn to_site(&self) -> Result<Site> {
        let location = GeoPoint::new(self.latitude_deg, self.longitude_deg)?;
        Ok(Site::new(self.name.clone(), location, self.utc_offset_hours)?)
    }
}

/// Everything the predictor reads from a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub site: SiteConfig,
    pub model: ModelConfig,
}

/// Raw site section from JSON
#[derive(Debug, Deserialize)]
struct RawSiteConfig {
    name: Option<String>,
    latitude_deg: Option<f64>,
    longitude_deg: Option<f64>,
    utc_offset_hours: Option<f64>,
}

/// Raw configuration file
#[derive(Debug, Deserialize)]
struct RawConfigFile {
    site: Option<RawSiteConfig>,
    model: Option<ModelConfig>,
}

/// Load a predictor configuration from a JSON file
pub fn load_config(path: impl AsRef<Path>) -> Result<PredictorConfig> {
    let path = path.as_ref();
    info!("Loading configuration from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: RawConfigFile = serde_json::from_reader(reader)?;

    let site = match raw.site {
        Some(site) => parse_site(site)?,
        None => {
            warn!("No site section, using {}", DEFAULT_SITE_NAME);
            SiteConfig::default()
        }
    };

    let model = raw.model.unwrap_or_default();
    model.validate()?;

    info!(
        "Site {} at {:.4}°, {:.4}° (UTC{:+})",
        site.name, site.latitude_deg, site.longitude_deg, site.utc_offset_hours
    );

    Ok(PredictorConfig { site, model })
}

fn parse_site(raw: RawSiteConfig) -> Result<SiteConfig> {
    let latitude_deg = raw
        .latitude_deg
        .ok_or(ConfigError::MissingField("site.latitude_deg"))?;
    let longitude_deg = raw
        .longitude_deg
        .ok_or(ConfigError::MissingField("site.longitude_deg"))?;
    // Coordinates are checked at load time
    GeoPoint::new(latitude_deg, longitude_deg)?;
    let utc_offset_hours = raw
        .utc_offset_hours
        .ok_or(ConfigError::MissingField("site.utc_offset_hours"))?;
    let name = sanitize_name(raw.name.unwrap_or_else(|| "Unknown".to_string()));

    Ok(SiteConfig {
        name,
        latitude_deg,
        longitude_deg,
        utc_offset_hours,
    })
}
