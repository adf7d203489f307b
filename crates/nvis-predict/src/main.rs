//! NVIS Propagation Prediction CLI
//!
//! Predicts one day of NVIS conditions for a site and writes a JSON report.
//!
//! Usage:
//!   nvis-predict --date 2023-04-18 --seed 42 --output nvis_prediction.json
//!   nvis-predict --site-config site.json --no-noise --parallel

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use nvis_model::grid::{all_hours, DEFAULT_SAMPLES};
use nvis_model::{GaussianNoise, Silent};
use nvis_predict::config::{load_config, PredictorConfig};
use nvis_predict::report::{build_report, log_summary, PredictionRequest};
use nvis_predict::{DEFAULT_DATE, DEFAULT_OUTPUT};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "nvis-predict",
    about = "Predict NVIS propagation for an HF field site"
)]
struct Args {
    /// Site/model configuration JSON file
    #[arg(short = 'c', long)]
    site_config: Option<PathBuf>,

    /// Site latitude in degrees (overrides config)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Site longitude in degrees (overrides config)
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Local UTC offset in hours (overrides config)
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<f64>,

    /// Site name (overrides config)
    #[arg(long)]
    name: Option<String>,

    /// Day to predict (YYYY-MM-DD)
    #[arg(short, long, default_value = DEFAULT_DATE)]
    date: NaiveDate,

    /// Frequency samples over 2-20 MHz
    #[arg(short, long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// Frequencies for the quality table (MHz)
    #[arg(long, value_delimiter = ',', default_value = "3.5,7.078,10.130,14.0,18.0")]
    frequencies: Vec<f64>,

    /// Frequencies to recommend (MHz)
    #[arg(long, value_delimiter = ',', default_value = "7.078,10.130")]
    recommend: Vec<f64>,

    /// Seed for reproducible noise
    #[arg(long, conflicts_with = "no_noise")]
    seed: Option<u64>,

    /// Disable the variability term
    #[arg(long)]
    no_noise: bool,

    /// Build the grid with rayon (requires the `parallel` feature)
    #[arg(long)]
    parallel: bool,

    /// Output JSON file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Configuration: defaults, then file, then flags
    let config = match &args.site_config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading configuration from {:?}", path))?,
        None => PredictorConfig::default(),
    };
    let site = config
        .site
        .with_overrides(args.name, args.lat, args.lon, args.utc_offset)
        .to_site()?;
    let model = config.model;

    let request = PredictionRequest {
        date: args.date,
        frequency_samples: args.samples,
        hours: all_hours(),
        frequencies_mhz: args.frequencies,
        recommend_mhz: args.recommend,
        parallel: args.parallel,
    };

    let report = if args.no_noise {
        info!("Noise disabled");
        build_report(&site, &model, &request, Silent)?
    } else {
        let noise = match args.seed {
            Some(seed) => {
                info!("Noise σ={} dB, seed {}", model.noise_sigma_db, seed);
                GaussianNoise::seeded(model.noise_sigma_db, seed)?
            }
            None => GaussianNoise::from_entropy(model.noise_sigma_db)?,
        };
        build_report(&site, &model, &request, noise)?
    };

    log_summary(&report);

    // Write output
    info!("\nWriting output to {:?}", args.output);
    let file = File::create(&args.output)
        .with_context(|| format!("creating {:?}", args.output))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;

    info!("Done.");

    Ok(())
}
