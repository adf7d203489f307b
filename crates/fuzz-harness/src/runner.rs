//! Fuzz test runner
//!
//! Wraps proptest configuration and runs deterministic case sweeps (one case
//! per index) for properties that are cheaper to enumerate than to sample.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

// ============================================================================
// Configuration
// ============================================================================

/// Fuzz test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Number of test cases to run
    pub cases: u64,
    /// Maximum shrink iterations on failure
    pub max_shrink_iters: u32,
    /// RNG seed for proptest runs (0 = seeded from the OS)
    pub seed: u64,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
            seed: 0,
        }
    }
}

impl FuzzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cases(mut self, n: u64) -> Self {
        self.cases = n;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = s;
        self
    }

    /// Generate proptest config from this
    pub fn to_proptest_config(&self) -> proptest::test_runner::Config {
        let mut config = proptest::test_runner::Config::default();
        config.cases = self.cases.min(u32::MAX as u64) as u32;
        config.max_shrink_iters = self.max_shrink_iters;
        if self.seed != 0 {
            config.rng_algorithm = proptest::test_runner::RngAlgorithm::ChaCha;
            config.rng_seed = proptest::test_runner::RngSeed::Fixed(self.seed);
        }
        config
    }
}

// ============================================================================
// Results
// ============================================================================

/// Result of a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzResult {
    pub name: String,
    pub cases_run: u64,
    pub cases_passed: u64,
    pub cases_failed: u64,
    pub duration_ms: u64,
    /// Failure messages, first ones only
    pub failures: Vec<String>,
    pub passed: bool,
}

/// Failures kept per result
const MAX_RECORDED_FAILURES: usize = 16;

impl FuzzResult {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cases_run: 0,
            cases_passed: 0,
            cases_failed: 0,
            duration_ms: 0,
            failures: Vec::new(),
            passed: true,
        }
    }

    pub fn record_pass(&mut self) {
        self.cases_run += 1;
        self.cases_passed += 1;
    }

    pub fn record_fail(&mut self, message: String) {
        self.cases_run += 1;
        self.cases_failed += 1;
        self.passed = false;
        if self.failures.len() < MAX_RECORDED_FAILURES {
            self.failures.push(message);
        }
    }

    pub fn finalize(&mut self, duration: Duration) {
        self.duration_ms = duration.as_millis() as u64;
    }

    /// Log summary
    pub fn log_summary(&self) {
        info!(
            "Fuzz {}: {} cases, {} passed, {} failed in {} ms",
            self.name, self.cases_run, self.cases_passed, self.cases_failed, self.duration_ms
        );
        for failure in &self.failures {
            warn!("  {}", failure);
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Deterministic sweep runner
pub struct FuzzRunner {
    config: FuzzConfig,
    results: Vec<FuzzResult>,
}

impl FuzzRunner {
    pub fn new(config: FuzzConfig) -> Self {
        Self {
            config,
            results: Vec::new(),
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(FuzzConfig::default())
    }

    /// Run `test_fn` once per case index `0..cases`
    pub fn run<F>(&mut self, name: &str, test_fn: F) -> FuzzResult
    where
        F: Fn(u64) -> Result<(), String>,
    {
        let mut result = FuzzResult::new(name);
        let start = Instant::now();

        for i in 0..self.config.cases {
            match test_fn(i) {
                Ok(()) => result.record_pass(),
                Err(msg) => result.record_fail(format!("case {}: {}", i, msg)),
            }
        }

        result.finalize(start.elapsed());
        result.log_summary();
        self.results.push(result.clone());
        result
    }

    pub fn results(&self) -> &[FuzzResult] {
        &self.results
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Export results to JSON
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.results)
    }
}
