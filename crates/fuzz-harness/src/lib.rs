//! NVIS Fuzz Harness
//!
//! Reusable property-based testing infrastructure for the propagation model.
//! Provides geographic, calendar and HF frequency strategies plus a small
//! deterministic sweep runner.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_fuzz_test(lat in latitude_deg(), f in hf_frequency_mhz()) {
//!         // Your test here
//!     }
//! }
//! ```

pub mod generators;
pub mod runner;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::runner::{FuzzConfig, FuzzResult, FuzzRunner};
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;
