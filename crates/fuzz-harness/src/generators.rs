//! Domain generators for property-based testing
//!
//! Every strategy yields values inside the documented input domain of the
//! model, so properties only need to state what must hold, not filter.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use proptest::prelude::*;

// ============================================================================
// Geographic Generators
// ============================================================================

/// Latitude (-90 to 90 deg)
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Longitude (-180 to 180 deg)
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Tropical latitudes where NVIS is used year-round (-30 to 30 deg)
pub fn tropical_latitude_deg() -> impl Strategy<Value = f64> {
    -30.0f64..=30.0
}

/// Site position (lat, lon)
pub fn site_position() -> impl Strategy<Value = (f64, f64)> {
    (latitude_deg(), longitude_deg())
}

/// UTC offset in quarter-hour steps (-12h to +14h)
pub fn utc_offset_hours() -> impl Strategy<Value = f64> {
    (-48i32..=56).prop_map(|quarters| quarters as f64 / 4.0)
}

// ============================================================================
// Calendar / Time Generators
// ============================================================================

/// Day of year (1-365)
pub fn day_of_year() -> impl Strategy<Value = u32> {
    1u32..=365
}

/// Local hour (0-23)
pub fn local_hour() -> impl Strategy<Value = u32> {
    0u32..24
}

/// Calendar date between 2000 and 2100
pub fn calendar_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..=2100, day_of_year())
        .prop_filter_map("valid ordinal date", |(year, ordinal)| {
            NaiveDate::from_yo_opt(year, ordinal)
        })
}

/// Local instant with an arbitrary offset, minute resolution
pub fn instant() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (calendar_date(), local_hour(), 0u32..60, utc_offset_hours()).prop_filter_map(
        "representable local instant",
        |(date, hour, minute, offset_h)| {
            let offset = FixedOffset::east_opt((offset_h * 3600.0) as i32)?;
            let naive = date.and_hms_opt(hour, minute, 0)?;
            offset.from_local_datetime(&naive).single()
        },
    )
}

// ============================================================================
// Ionospheric / Frequency Generators
// ============================================================================

/// Any HF frequency including below-band values (0.5-30 MHz)
pub fn hf_frequency_mhz() -> impl Strategy<Value = f64> {
    0.5f64..=30.0
}

/// Frequency inside the sampled grid range (2-20 MHz)
pub fn sampled_frequency_mhz() -> impl Strategy<Value = f64> {
    2.0f64..=20.0
}

/// Solar zenith angle (0-180 deg)
pub fn zenith_deg() -> impl Strategy<Value = f64> {
    0.0f64..=180.0
}

/// Daytime solar zenith angle (0 to just under 90 deg)
pub fn daytime_zenith_deg() -> impl Strategy<Value = f64> {
    0.0f64..90.0
}

/// Planetary K-index (0-9)
pub fn kp_index() -> impl Strategy<Value = f64> {
    0.0f64..=9.0
}

/// Noise standard deviation (0-30 dB)
pub fn noise_sigma_db() -> impl Strategy<Value = f64> {
    0.0f64..=30.0
}

/// Ascending, deduplicated frequency axis inside the grid range
pub fn frequency_axis(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(sampled_frequency_mhz(), 1..=max_len).prop_map(|mut v| {
        v.sort_by(f64::total_cmp);
        v.dedup();
        v
    })
}

/// Ascending, deduplicated subset of local hours
pub fn hour_axis() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(local_hour(), 1..=12).prop_map(|s| s.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    proptest! {
        #[test]
        fn test_latitude_bounds(v in latitude_deg()) {
            prop_assert!((-90.0..=90.0).contains(&v));
        }

        #[test]
        fn test_offset_quarter_hours(v in utc_offset_hours()) {
            prop_assert!((-12.0..=14.0).contains(&v));
            prop_assert_eq!((v * 4.0).fract(), 0.0);
        }

        #[test]
        fn test_instant_fields(t in instant()) {
            prop_assert!(t.hour() < 24);
            prop_assert!((1..=366).contains(&t.ordinal()));
            prop_assert!((2000..=2100).contains(&t.year()));
        }

        #[test]
        fn test_axes_ascending(f in frequency_axis(16), h in hour_axis()) {
            prop_assert!(!f.is_empty());
            prop_assert!(f.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(h.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(h.iter().all(|&x| x < 24));
        }
    }
}
