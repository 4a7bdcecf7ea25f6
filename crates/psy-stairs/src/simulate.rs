//! Simulated listeners for exercising staircases without an operator.

use psy_core::errors::{ErrorInfo, PsyError};
use psy_core::RngHandle;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::StaircaseConfig;
use crate::staircase::{Staircase, StaircaseSummary};

/// Logistic 2AFC psychometric function over staircase levels.
///
/// Higher levels are easier: performance rises from chance (0.5) towards 1.0,
/// crossing 0.75 at `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsychometricObserver {
    pub threshold: f64,
    /// Spread of the logistic; smaller values give a steeper function.
    pub width: f64,
}

impl PsychometricObserver {
    pub fn new(threshold: f64, width: f64) -> Result<Self, PsyError> {
        if width.is_nan() || width <= 0.0 || !threshold.is_finite() {
            return Err(PsyError::Configuration(
                ErrorInfo::new("observer-params", "width must be positive and threshold finite")
                    .with_context("threshold", threshold)
                    .with_context("width", width),
            ));
        }
        Ok(Self { threshold, width })
    }

    /// Probability of a correct response at `level`.
    pub fn p_correct(&self, level: i64) -> f64 {
        let z = (level as f64 - self.threshold) / self.width;
        0.5 + 0.5 / (1.0 + (-z).exp())
    }

    /// Draws one response at `level`.
    pub fn respond(&self, level: i64, rng: &mut RngHandle) -> bool {
        rng.gen_bool(self.p_correct(level))
    }
}

/// Runs a staircase against `observer` until it finishes or `max_trials`
/// responses (pretrials included) have been given.
pub fn simulate_run(
    config: StaircaseConfig,
    observer: &PsychometricObserver,
    rng: &mut RngHandle,
    max_trials: usize,
    threshold_reversals: usize,
) -> Result<StaircaseSummary, PsyError> {
    let mut stairs = Staircase::new(config)?;
    let mut trials = 0;
    while let Some(level) = stairs.next_level() {
        if trials >= max_trials {
            tracing::warn!(trials, "simulated run stopped before the reversal target");
            break;
        }
        stairs.add_response(observer.respond(level, rng))?;
        trials += 1;
    }
    Ok(stairs.summary(threshold_reversals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosses_three_quarters_at_threshold() {
        let observer = PsychometricObserver::new(4.0, 1.0).expect("observer");
        assert!((observer.p_correct(4) - 0.75).abs() < 1e-12);
        assert!(observer.p_correct(0) < observer.p_correct(8));
        assert!(observer.p_correct(100) <= 1.0);
    }

    #[test]
    fn rejects_degenerate_width() {
        assert!(PsychometricObserver::new(1.0, 0.0).is_err());
        assert!(PsychometricObserver::new(f64::NAN, 1.0).is_err());
    }
}
