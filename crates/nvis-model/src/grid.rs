//! Frequency × hour suitability surface
//!
//! One [`IonosphericState`] is derived per hour and every frequency sample is
//! evaluated against it. Cells are stored hour-major so each hour's row is one
//! contiguous chunk, which is also the unit of work for the parallel build.

use crate::ionosphere::{IonosphericModel, IonosphericState};
use crate::noise::NoiseSource;
use crate::signal::SignalPredictor;
use crate::{ModelError, Result, Site};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lower edge of the sampled HF range (MHz)
pub const MIN_FREQUENCY_MHZ: f64 = 2.0;
/// Upper edge of the sampled HF range (MHz)
pub const MAX_FREQUENCY_MHZ: f64 = 20.0;
pub const DEFAULT_SAMPLES: usize = 100;
pub const HOURS_PER_DAY: u32 = 24;

/// `n` evenly spaced samples over `[2, 20]` MHz, both ends included.
pub fn frequency_samples(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![MIN_FREQUENCY_MHZ],
        _ => {
            let step = (MAX_FREQUENCY_MHZ - MIN_FREQUENCY_MHZ) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        MAX_FREQUENCY_MHZ
                    } else {
                        MIN_FREQUENCY_MHZ + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Local hours 0..23
pub fn all_hours() -> Vec<u32> {
    (0..HOURS_PER_DAY).collect()
}

/// Dense grid of predicted strengths (dB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSurface")]
pub struct SuitabilitySurface {
    frequencies_mhz: Vec<f64>,
    hours: Vec<u32>,
    /// Hour-major: `values_db[hour_index * frequencies.len() + freq_index]`
    values_db: Vec<f64>,
}

/// Unchecked surface as read from JSON
#[derive(Deserialize)]
struct RawSurface {
    frequencies_mhz: Vec<f64>,
    hours: Vec<u32>,
    values_db: Vec<f64>,
}

impl TryFrom<RawSurface> for SuitabilitySurface {
    type Error = ModelError;

    fn try_from(raw: RawSurface) -> Result<Self> {
        let expected = raw.frequencies_mhz.len() * raw.hours.len();
        if raw.values_db.len() != expected {
            return Err(ModelError::SurfaceShape {
                frequencies: raw.frequencies_mhz.len(),
                hours: raw.hours.len(),
                actual: raw.values_db.len(),
            });
        }
        Ok(Self {
            frequencies_mhz: raw.frequencies_mhz,
            hours: raw.hours,
            values_db: raw.values_db,
        })
    }
}

impl SuitabilitySurface {
    pub fn frequencies_mhz(&self) -> &[f64] {
        &self.frequencies_mhz
    }

    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    pub fn get(&self, freq_index: usize, hour_index: usize) -> Option<f64> {
        if freq_index >= self.frequencies_mhz.len() || hour_index >= self.hours.len() {
            return None;
        }
        self.values_db
            .get(hour_index * self.frequencies_mhz.len() + freq_index)
            .copied()
    }

    /// Strengths of one frequency across all hours
    pub fn frequency_row(&self, freq_index: usize) -> Option<Vec<f64>> {
        if freq_index >= self.frequencies_mhz.len() {
            return None;
        }
        Some(
            self.values_db
                .iter()
                .skip(freq_index)
                .step_by(self.frequencies_mhz.len())
                .copied()
                .collect(),
        )
    }

    /// Strengths of all frequencies at one hour
    pub fn hour_column(&self, hour_index: usize) -> Option<&[f64]> {
        let n = self.frequencies_mhz.len();
        if hour_index >= self.hours.len() {
            return None;
        }
        self.values_db.get(hour_index * n..(hour_index + 1) * n)
    }

    /// `(frequency_mhz, hour, strength_db)` for every cell
    pub fn cells(&self) -> impl Iterator<Item = (f64, u32, f64)> + '_ {
        let n = self.frequencies_mhz.len().max(1);
        self.hours
            .iter()
            .zip(self.values_db.chunks(n))
            .flat_map(move |(&hour, row)| {
                self.frequencies_mhz
                    .iter()
                    .zip(row)
                    .map(move |(&freq, &value)| (freq, hour, value))
            })
    }

    pub fn len(&self) -> usize {
        self.values_db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values_db.is_empty()
    }

    pub fn min_db(&self) -> Option<f64> {
        self.values_db.iter().copied().reduce(f64::min)
    }

    pub fn max_db(&self) -> Option<f64> {
        self.values_db.iter().copied().reduce(f64::max)
    }
}

/// Builds [`SuitabilitySurface`]s from an ionospheric model
#[derive(Debug, Clone, Copy, Default)]
pub struct SuitabilityGrid {
    model: IonosphericModel,
}

impl SuitabilityGrid {
    pub fn new(model: IonosphericModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &IonosphericModel {
        &self.model
    }

    pub fn build<N: NoiseSource>(
        &self,
        site: &Site,
        day: NaiveDate,
        frequencies_mhz: &[f64],
        hours: &[u32],
        predictor: &mut SignalPredictor<N>,
    ) -> Result<SuitabilitySurface> {
        let (states, mut predictors) = self.prepare(site, day, frequencies_mhz, hours, predictor)?;
        let mut values_db = vec![0.0; frequencies_mhz.len() * hours.len()];

        for ((row, state), hour_predictor) in values_db
            .chunks_mut(frequencies_mhz.len())
            .zip(&states)
            .zip(predictors.iter_mut())
        {
            fill_row(row, frequencies_mhz, state, hour_predictor)?;
        }

        Ok(SuitabilitySurface {
            frequencies_mhz: frequencies_mhz.to_vec(),
            hours: hours.to_vec(),
            values_db,
        })
    }

    /// Same surface as [`build`](Self::build), one rayon task per hour
    #[cfg(feature = "parallel")]
    pub fn build_parallel<N: NoiseSource>(
        &self,
        site: &Site,
        day: NaiveDate,
        frequencies_mhz: &[f64],
        hours: &[u32],
        predictor: &mut SignalPredictor<N>,
    ) -> Result<SuitabilitySurface> {
        let (states, mut predictors) = self.prepare(site, day, frequencies_mhz, hours, predictor)?;
        let mut values_db = vec![0.0; frequencies_mhz.len() * hours.len()];

        values_db
            .par_chunks_mut(frequencies_mhz.len())
            .zip(states.par_iter())
            .zip(predictors.par_iter_mut())
            .try_for_each(|((row, state), hour_predictor)| {
                fill_row(row, frequencies_mhz, state, hour_predictor)
            })?;

        Ok(SuitabilitySurface {
            frequencies_mhz: frequencies_mhz.to_vec(),
            hours: hours.to_vec(),
            values_db,
        })
    }

    /// Validated axes, one state per hour and one noise stream per hour
    fn prepare<N: NoiseSource>(
        &self,
        site: &Site,
        day: NaiveDate,
        frequencies_mhz: &[f64],
        hours: &[u32],
        predictor: &mut SignalPredictor<N>,
    ) -> Result<(Vec<IonosphericState>, Vec<SignalPredictor<N>>)> {
        validate_frequencies(frequencies_mhz)?;
        validate_hours(hours)?;

        let states = self.model.day_states(site, day, hours)?;
        let predictors = hours.iter().map(|_| predictor.split()).collect();

        debug!(
            "Grid for {} on {}: {} frequencies × {} hours",
            site.name,
            day,
            frequencies_mhz.len(),
            hours.len()
        );

        Ok((states, predictors))
    }
}

fn fill_row<N: NoiseSource>(
    row: &mut [f64],
    frequencies_mhz: &[f64],
    state: &IonosphericState,
    predictor: &mut SignalPredictor<N>,
) -> Result<()> {
    for (cell, &frequency) in row.iter_mut().zip(frequencies_mhz) {
        *cell = predictor.strength_db(frequency, state)?;
    }
    Ok(())
}

pub fn validate_frequencies(frequencies_mhz: &[f64]) -> Result<()> {
    if frequencies_mhz.is_empty() {
        return Err(ModelError::EmptyAxis("frequency"));
    }
    for (i, &frequency) in frequencies_mhz.iter().enumerate() {
        if !frequency.is_finite() {
            return Err(ModelError::InvalidFrequency(frequency));
        }
        if !(MIN_FREQUENCY_MHZ..=MAX_FREQUENCY_MHZ).contains(&frequency) {
            return Err(ModelError::FrequencyOutOfRange {
                frequency,
                min: MIN_FREQUENCY_MHZ,
                max: MAX_FREQUENCY_MHZ,
            });
        }
        if i > 0 && frequency <= frequencies_mhz[i - 1] {
            return Err(ModelError::UnorderedFrequencies(i));
        }
    }
    Ok(())
}

pub fn validate_hours(hours: &[u32]) -> Result<()> {
    if hours.is_empty() {
        return Err(ModelError::EmptyAxis("hour"));
    }
    for (i, &hour) in hours.iter().enumerate() {
        if hour >= HOURS_PER_DAY {
            return Err(ModelError::InvalidHour(hour));
        }
        if i > 0 && hour <= hours[i - 1] {
            return Err(ModelError::UnorderedHours(i));
        }
    }
    Ok(())
}
