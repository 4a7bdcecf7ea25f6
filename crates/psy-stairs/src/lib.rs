//! Adaptive transformed up/down staircases.
//!
//! A [`Staircase`] walks an integer level over an index range, stepping down
//! after `n_down` consecutive correct responses and up after `n_up` consecutive
//! incorrect ones. Step sizes shrink as reversals accumulate and the run ends
//! after a configured number of reversals; the threshold is the mean of the last
//! reversal levels.

pub mod config;
pub mod simulate;
pub mod staircase;

pub use config::StaircaseConfig;
pub use simulate::{simulate_run, PsychometricObserver};
pub use staircase::{Direction, Staircase, StaircaseSummary, StepOutcome};
