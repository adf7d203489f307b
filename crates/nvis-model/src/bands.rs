//! Amateur HF allocations and NVIS operating windows

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    pub name: &'static str,
    pub lower_khz: u32,
    pub upper_khz: u32,
}

impl Band {
    /// Const constructor that receives the limits in kHz.
    pub const fn new_from_khz(lower_khz: u32, upper_khz: u32, name: &'static str) -> Self {
        Self {
            name,
            lower_khz,
            upper_khz,
        }
    }

    pub fn lower_mhz(&self) -> f64 {
        self.lower_khz as f64 / 1_000.0
    }

    pub fn upper_mhz(&self) -> f64 {
        self.upper_khz as f64 / 1_000.0
    }

    pub fn contains(&self, frequency_mhz: f64) -> bool {
        (self.lower_mhz()..=self.upper_mhz()).contains(&frequency_mhz)
    }

    pub fn center_mhz(&self) -> f64 {
        (self.lower_mhz() + self.upper_mhz()) / 2.0
    }
}

pub const HF_BANDS: &[Band] = &[
    Band::new_from_khz(1_800, 2_000, "160m"),
    Band::new_from_khz(3_500, 4_000, "80m"),
    Band::new_from_khz(5_330, 5_410, "60m"),
    Band::new_from_khz(7_000, 7_300, "40m"),
    Band::new_from_khz(10_100, 10_150, "30m"),
    Band::new_from_khz(14_000, 14_350, "20m"),
    Band::new_from_khz(18_068, 18_168, "17m"),
    Band::new_from_khz(21_000, 21_450, "15m"),
    Band::new_from_khz(24_890, 24_990, "12m"),
    Band::new_from_khz(28_000, 29_700, "10m"),
];

pub fn band_for(frequency_mhz: f64) -> Option<&'static Band> {
    HF_BANDS.iter().find(|band| band.contains(frequency_mhz))
}

/// Typical NVIS usage by frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NvisWindow {
    /// 2-8 MHz, low foF2 after sunset
    Night,
    /// 8-15 MHz, midday foF2
    Day,
    /// 15-20 MHz, solar maximum only
    Extended,
    NotNvis,
}

pub const NIGHT_WINDOW_MHZ: (f64, f64) = (2.0, 8.0);
pub const DAY_WINDOW_MHZ: (f64, f64) = (8.0, 15.0);
pub const EXTENDED_WINDOW_MHZ: (f64, f64) = (15.0, 20.0);

impl NvisWindow {
    pub fn classify(frequency_mhz: f64) -> Self {
        if (NIGHT_WINDOW_MHZ.0..NIGHT_WINDOW_MHZ.1).contains(&frequency_mhz) {
            NvisWindow::Night
        } else if (DAY_WINDOW_MHZ.0..DAY_WINDOW_MHZ.1).contains(&frequency_mhz) {
            NvisWindow::Day
        } else if (EXTENDED_WINDOW_MHZ.0..=EXTENDED_WINDOW_MHZ.1).contains(&frequency_mhz) {
            NvisWindow::Extended
        } else {
            NvisWindow::NotNvis
        }
    }

    pub fn is_nvis(&self) -> bool {
        *self != NvisWindow::NotNvis
    }
}
