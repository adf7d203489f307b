//! Prediction report assembly and summary logging

use crate::Result;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use nvis_model::bands::{band_for, NvisWindow};
use nvis_model::grid::all_hours;
use nvis_model::quality::{assess, QualityAssessment};
use nvis_model::{
    frequency_samples, IonosphericModel, IonosphericState, ModelConfig, ModelError, NoiseSource,
    Recommendation, RecommendationEngine, SignalPredictor, Site, SuitabilityGrid,
    SuitabilitySurface,
};
use serde::Serialize;
use tracing::{debug, info};

/// Incidence from vertical used for quality assessments (degrees)
pub const NVIS_INCIDENCE_DEG: f64 = 0.0;

/// What to compute for one day
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub date: NaiveDate,
    pub frequency_samples: usize,
    pub hours: Vec<u32>,
    /// Frequencies for the quality table (MHz)
    pub frequencies_mhz: Vec<f64>,
    /// Frequencies to recommend (MHz)
    pub recommend_mhz: Vec<f64>,
    pub parallel: bool,
}

impl PredictionRequest {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            frequency_samples: nvis_model::grid::DEFAULT_SAMPLES,
            hours: all_hours(),
            frequencies_mhz: crate::DEFAULT_FREQUENCIES_MHZ.to_vec(),
            recommend_mhz: crate::DEFAULT_RECOMMEND_MHZ.to_vec(),
            parallel: false,
        }
    }
}

/// One operating frequency checked against the reference-hour foF2
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyAssessment {
    pub frequency_mhz: f64,
    pub band: Option<&'static str>,
    pub window: NvisWindow,
    pub quality: QualityAssessment,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub site: Site,
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub model: ModelConfig,
    pub frequency_samples: Vec<f64>,
    pub hours: Vec<u32>,
    pub states: Vec<IonosphericState>,
    pub surface: SuitabilitySurface,
    pub recommendations: Vec<Recommendation>,
    pub assessments: Vec<FrequencyAssessment>,
}

impl PredictionReport {
    pub fn reference_state(&self) -> Option<&IonosphericState> {
        self.states
            .iter()
            .find(|s| s.instant.hour() == self.model.reference_hour)
    }
}

/// Run the model for `request` at `site`
pub fn build_report<N: NoiseSource>(
    site: &Site,
    model: &ModelConfig,
    request: &PredictionRequest,
    noise: N,
) -> Result<PredictionReport> {
    model.validate()?;

    let ionosphere = IonosphericModel::new(model);
    let grid = SuitabilityGrid::new(ionosphere);
    let engine = RecommendationEngine::new(model);
    let mut predictor = SignalPredictor::new(noise);

    info!(
        "Predicting {} on {} ({} samples × {} hours)",
        site.name,
        request.date,
        request.frequency_samples,
        request.hours.len()
    );

    let states = ionosphere.day_states(site, request.date, &request.hours)?;
    let samples = frequency_samples(request.frequency_samples);
    let surface = build_surface(&grid, site, request, &samples, &mut predictor)?;
    debug!(
        "Surface range {:?} .. {:?} dB",
        surface.min_db(),
        surface.max_db()
    );

    let mut recommendations = Vec::with_capacity(request.recommend_mhz.len());
    for &frequency in &request.recommend_mhz {
        recommendations.push(engine.recommend(frequency, &states, &mut predictor)?);
    }

    let reference = states
        .iter()
        .find(|s| s.instant.hour() == model.reference_hour)
        .ok_or(ModelError::MissingReferenceHour(model.reference_hour))?;

    let mut assessments = Vec::with_capacity(request.frequencies_mhz.len());
    for &frequency in &request.frequencies_mhz {
        assessments.push(FrequencyAssessment {
            frequency_mhz: frequency,
            band: band_for(frequency).map(|b| b.name),
            window: NvisWindow::classify(frequency),
            quality: assess(frequency, reference.fof2_mhz, NVIS_INCIDENCE_DEG)?,
        });
    }

    Ok(PredictionReport {
        site: site.clone(),
        date: request.date,
        generated_at: Utc::now(),
        model: model.clone(),
        frequency_samples: samples,
        hours: request.hours.clone(),
        states,
        surface,
        recommendations,
        assessments,
    })
}

#[cfg(feature = "parallel")]
fn build_surface<N: NoiseSource>(
    grid: &SuitabilityGrid,
    site: &Site,
    request: &PredictionRequest,
    samples: &[f64],
    predictor: &mut SignalPredictor<N>,
) -> Result<SuitabilitySurface> {
    let surface = if request.parallel {
        grid.build_parallel(site, request.date, samples, &request.hours, predictor)?
    } else {
        grid.build(site, request.date, samples, &request.hours, predictor)?
    };
    Ok(surface)
}

#[cfg(not(feature = "parallel"))]
fn build_surface<N: NoiseSource>(
    grid: &SuitabilityGrid,
    site: &Site,
    request: &PredictionRequest,
    samples: &[f64],
    predictor: &mut SignalPredictor<N>,
) -> Result<SuitabilitySurface> {
    if request.parallel {
        tracing::warn!("Built without the `parallel` feature, building the grid sequentially");
    }
    Ok(grid.build(site, request.date, samples, &request.hours, predictor)?)
}

/// Log the hourly table, recommendations and assessments
pub fn log_summary(report: &PredictionReport) {
    info!("{}", "=".repeat(60));
    info!("NVIS PROPAGATION MODEL");
    info!("{}", "=".repeat(60));
    info!(
        "Location: {} ({:.3}°, {:.3}°), UTC{}",
        report.site.name,
        report.site.location.latitude_deg(),
        report.site.location.longitude_deg(),
        report.site.utc_offset
    );
    info!("Date: {}", report.date);

    info!("\nHour | Zenith |  foF2  |  MUF   |  OWF   |  LUF");
    for state in &report.states {
        info!(
            "{:>4} | {:>6.1} | {:>6.2} | {:>6.2} | {:>6.2} | {:>5.2}{}",
            state.instant.hour(),
            state.solar_zenith_deg,
            state.fof2_mhz,
            state.muf_mhz,
            state.owf_mhz,
            state.luf_mhz,
            if state.is_daytime() { "" } else { "  (night)" }
        );
    }

    info!("\n{}", "=".repeat(60));
    info!("NVIS FREQUENCY RECOMMENDATIONS");
    info!("{}", "=".repeat(60));
    for rec in &report.recommendations {
        if rec.favorable_hours.is_empty() {
            info!("{:.3} MHz: limited propagation expected", rec.frequency_mhz);
        } else {
            info!(
                "{:.3} MHz: best hours {:?} ({}/{} hours)",
                rec.frequency_mhz,
                rec.favorable_hours,
                rec.favorable_hours.len(),
                rec.hours_evaluated
            );
        }
        info!("  {:02}:00 verdict: {}", rec.reference_hour, rec.verdict);
    }

    info!("\n{}", "=".repeat(60));
    info!("FREQUENCY QUALITY");
    info!("{}", "=".repeat(60));
    for a in &report.assessments {
        info!(
            "{:>7.3} MHz | {:>4} | {:?} | factor {:.2} | {} ({:+} dB)",
            a.frequency_mhz,
            a.band.unwrap_or("-"),
            a.window,
            a.quality.nvis_factor,
            a.quality.class,
            a.quality.expected_snr_db
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvis_model::recommend::Verdict;
    use nvis_model::{GaussianNoise, GeoPoint, Silent};

    fn dgfc() -> Site {
        Site::new("DGFC", GeoPoint::new(5.4139, 118.0385).unwrap(), 8.0).unwrap()
    }

    fn request() -> PredictionRequest {
        PredictionRequest::new(NaiveDate::from_ymd_opt(2023, 4, 18).unwrap())
    }

    #[test]
    fn test_default_report() {
        let report = build_report(&dgfc(), &ModelConfig::default(), &request(), Silent).unwrap();

        assert_eq!(report.states.len(), 24);
        assert_eq!(report.frequency_samples.len(), 100);
        assert_eq!(report.surface.len(), 100 * 24);
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.assessments.len(), 5);

        let forty = &report.recommendations[0];
        assert_eq!(forty.frequency_mhz, 7.078);
        assert_eq!(forty.verdict, Verdict::Excellent);

        let noon = report.reference_state().unwrap();
        assert!(noon.is_daytime());
        assert_eq!(report.assessments[1].band, Some("40m"));
        assert_eq!(report.assessments[1].window, NvisWindow::Night);
    }

    #[test]
    fn test_seeded_reports_match() {
        let a = build_report(
            &dgfc(),
            &ModelConfig::default(),
            &request(),
            GaussianNoise::seeded(2.0, 9).unwrap(),
        )
        .unwrap();
        let b = build_report(
            &dgfc(),
            &ModelConfig::default(),
            &request(),
            GaussianNoise::seeded(2.0, 9).unwrap(),
        )
        .unwrap();

        assert_eq!(a.surface, b.surface);
        assert_eq!(a.recommendations, b.recommendations);
    }

    #[test]
    fn test_report_serializes() {
        let report = build_report(&dgfc(), &ModelConfig::default(), &request(), Silent).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["site"]["name"], "DGFC");
        assert_eq!(json["site"]["utc_offset"], "+08:00");
        assert_eq!(json["date"], "2023-04-18");
        assert_eq!(json["recommendations"][0]["verdict"], "excellent");
        assert_eq!(json["states"].as_array().unwrap().len(), 24);
    }

    #[test]
    fn test_missing_reference_hour() {
        let mut req = request();
        req.hours = (0..6).collect();
        let result = build_report(&dgfc(), &ModelConfig::default(), &req, Silent);
        assert!(matches!(
            result,
            Err(crate::ConfigError::Model(ModelError::MissingReferenceHour(12)))
        ));
    }

    #[test]
    fn test_parallel_request_builds() {
        let mut req = request();
        req.parallel = true;
        req.frequency_samples = 10;
        let report = build_report(&dgfc(), &ModelConfig::default(), &req, Silent).unwrap();
        assert_eq!(report.surface.len(), 10 * 24);
    }
}
