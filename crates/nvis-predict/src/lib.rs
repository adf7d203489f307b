//! NVIS Propagation Predictor
//!
//! Loads a site and model configuration, runs the propagation model over one
//! day and bundles the results into a JSON report.
//!
//! # Report Contents
//!
//! | Section           | Source |
//! |-------------------|--------|
//! | `states`          | One ionospheric state per local hour |
//! | `surface`         | Frequency × hour strength grid over 2-20 MHz |
//! | `recommendations` | Favorable hours and noon verdict per frequency |
//! | `assessments`     | foF2 quality class, band and NVIS window per frequency |
//!
//! # Default Site
//!
//! DGFC field site, 5.4139°N 118.0385°E, UTC+8.

use nvis_model::ModelError;
use thiserror::Error;

pub mod config;
pub mod report;

pub use config::{PredictorConfig, SiteConfig};
pub use report::{build_report, PredictionReport, PredictionRequest};

pub const DEFAULT_SITE_NAME: &str = "DGFC";
pub const DEFAULT_LATITUDE_DEG: f64 = 5.4139;
pub const DEFAULT_LONGITUDE_DEG: f64 = 118.0385;
pub const DEFAULT_UTC_OFFSET_HOURS: f64 = 8.0;

/// Day of the reference field trial
pub const DEFAULT_DATE: &str = "2023-04-18";

/// Frequencies assessed in the hourly table (MHz)
pub const DEFAULT_FREQUENCIES_MHZ: [f64; 5] = [3.5, 7.078, 10.130, 14.0, 18.0];

/// Frequencies that receive a recommendation (MHz)
pub const DEFAULT_RECOMMEND_MHZ: [f64; 2] = [7.078, 10.130];

pub const DEFAULT_OUTPUT: &str = "nvis_prediction.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
