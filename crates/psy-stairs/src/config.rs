use psy_core::errors::{ErrorInfo, PsyError};
use serde::{Deserialize, Serialize};

/// Parameters of a transformed up/down staircase.
///
/// Levels are integer indices into a list of stimulus values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaircaseConfig {
    /// Level presented first and during pretrials.
    pub start_val: i64,
    /// Number of reversals after which the run is finished.
    pub n_reversals: usize,
    /// Step size used after 0, 1, 2, ... reversals; the last entry repeats.
    pub step_sizes: Vec<i64>,
    #[serde(default)]
    pub min_val: i64,
    pub max_val: i64,
    /// Consecutive incorrect responses required to step up.
    #[serde(default = "default_one")]
    pub n_up: u32,
    /// Consecutive correct responses required to step down.
    #[serde(default = "default_one")]
    pub n_down: u32,
    /// Leading responses that are recorded but never move the level.
    #[serde(default)]
    pub n_pretrials: usize,
}

fn default_one() -> u32 {
    1
}

impl StaircaseConfig {
    /// Checks range, step and rule parameters.
    pub fn validate(&self) -> Result<(), PsyError> {
        if self.min_val > self.max_val {
            return Err(PsyError::Configuration(
                ErrorInfo::new("staircase-range", "min_val exceeds max_val")
                    .with_context("min_val", self.min_val)
                    .with_context("max_val", self.max_val),
            ));
        }
        if self.start_val < self.min_val || self.start_val > self.max_val {
            return Err(PsyError::Configuration(
                ErrorInfo::new("staircase-start", "start_val outside [min_val, max_val]")
                    .with_context("start_val", self.start_val)
                    .with_context("min_val", self.min_val)
                    .with_context("max_val", self.max_val),
            ));
        }
        if self.step_sizes.is_empty() {
            return Err(PsyError::config("staircase-steps", "step_sizes must not be empty"));
        }
        if let Some(step) = self.step_sizes.iter().find(|step| **step <= 0) {
            return Err(PsyError::Configuration(
                ErrorInfo::new("staircase-steps", "step sizes must be positive")
                    .with_context("step", step),
            ));
        }
        if self.n_up == 0 || self.n_down == 0 {
            return Err(PsyError::Configuration(
                ErrorInfo::new("staircase-rule", "n_up and n_down must be at least 1")
                    .with_context("n_up", self.n_up)
                    .with_context("n_down", self.n_down),
            ));
        }
        if self.n_reversals == 0 {
            return Err(PsyError::config("staircase-reversals", "n_reversals must be at least 1"));
        }
        Ok(())
    }

    /// Reversal count the run actually stops at: never fewer than the number of
    /// step sizes, so every step size is used.
    pub fn effective_reversals(&self) -> usize {
        self.n_reversals.max(self.step_sizes.len())
    }
}
