use psy_core::errors::{ErrorInfo, PsyError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::StaircaseConfig;

/// Direction of a level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// What a single response did to the staircase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The response was consumed as a pretrial.
    pub pretrial: bool,
    /// Direction of the step taken, if the streak triggered one.
    pub direction: Option<Direction>,
    /// The step reversed the previous direction.
    pub reversal: bool,
    /// Level to present next.
    pub next_level: i64,
    /// The reversal target has been reached.
    pub finished: bool,
}

/// Record of a completed (or abandoned) staircase run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaircaseSummary {
    pub config: StaircaseConfig,
    /// Levels presented for every non-pretrial response, in order.
    pub levels: Vec<i64>,
    pub responses: Vec<bool>,
    pub pretrial_responses: Vec<bool>,
    /// Level of each trial that triggered a reversal.
    pub reversals: Vec<i64>,
    pub threshold: Option<f64>,
    pub finished: bool,
}

/// Transformed up/down staircase over integer levels.
#[derive(Debug, Clone)]
pub struct Staircase {
    config: StaircaseConfig,
    target_reversals: usize,
    level: i64,
    direction: Option<Direction>,
    streak: i64,
    levels: Vec<i64>,
    responses: Vec<bool>,
    pretrial_responses: Vec<bool>,
    reversals: Vec<i64>,
    finished: bool,
}

impl Staircase {
    /// Validates `config` and positions the staircase at `start_val`.
    pub fn new(config: StaircaseConfig) -> Result<Self, PsyError> {
        config.validate()?;
        let target_reversals = config.effective_reversals();
        if target_reversals != config.n_reversals {
            warn!(
                requested = config.n_reversals,
                effective = target_reversals,
                "n_reversals raised to the number of step sizes"
            );
        }
        Ok(Self {
            level: config.start_val,
            config,
            target_reversals,
            direction: None,
            streak: 0,
            levels: Vec::new(),
            responses: Vec::new(),
            pretrial_responses: Vec::new(),
            reversals: Vec::new(),
            finished: false,
        })
    }

    /// Level to present next, `None` once the run is finished.
    pub fn next_level(&self) -> Option<i64> {
        if self.finished {
            None
        } else {
            Some(self.level)
        }
    }

    /// Feeds the correctness of the trial presented at [`Staircase::next_level`].
    pub fn add_response(&mut self, correct: bool) -> Result<StepOutcome, PsyError> {
        if self.finished {
            return Err(PsyError::EndOfSequence(
                ErrorInfo::new("staircase-finished", "staircase already reached its reversal target")
                    .with_context("reversals", self.reversals.len()),
            ));
        }

        if self.pretrial_responses.len() < self.config.n_pretrials {
            self.pretrial_responses.push(correct);
            return Ok(StepOutcome {
                pretrial: true,
                direction: None,
                reversal: false,
                next_level: self.level,
                finished: false,
            });
        }

        let presented = self.level;
        self.levels.push(presented);
        self.responses.push(correct);
        self.streak = if correct {
            self.streak.max(0) + 1
        } else {
            self.streak.min(0) - 1
        };

        let direction = if self.streak >= i64::from(self.config.n_down) {
            Some(Direction::Down)
        } else if self.streak <= -i64::from(self.config.n_up) {
            Some(Direction::Up)
        } else {
            None
        };

        let mut reversal = false;
        if let Some(direction) = direction {
            self.streak = 0;
            reversal = self.direction.map_or(false, |previous| previous != direction);
            if reversal {
                self.reversals.push(presented);
            }
            let step = self.step_size();
            let unclamped = match direction {
                Direction::Up => presented + step,
                Direction::Down => presented - step,
            };
            self.level = unclamped.clamp(self.config.min_val, self.config.max_val);
            self.direction = Some(direction);
            debug!(
                level = presented,
                next = self.level,
                step,
                reversal,
                reversals = self.reversals.len(),
                "staircase step"
            );
        }

        self.finished = self.reversals.len() >= self.target_reversals;
        Ok(StepOutcome {
            pretrial: false,
            direction,
            reversal,
            next_level: self.level,
            finished: self.finished,
        })
    }

    fn step_size(&self) -> i64 {
        let last = self.config.step_sizes.len() - 1;
        self.config.step_sizes[self.reversals.len().min(last)]
    }

    /// Mean of the last `n` reversal levels (all of them if there are fewer).
    pub fn threshold(&self, n: usize) -> Option<f64> {
        if self.reversals.is_empty() || n == 0 {
            return None;
        }
        let tail = &self.reversals[self.reversals.len().saturating_sub(n)..];
        let sum: i64 = tail.iter().sum();
        Some(sum as f64 / tail.len() as f64)
    }

    /// Threshold rounded up and clamped into a value list of length `len`.
    pub fn threshold_index(&self, n: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let threshold = self.threshold(n)?;
        let index = threshold.ceil().max(0.0) as usize;
        Some(index.min(len - 1))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn reversals(&self) -> &[i64] {
        &self.reversals
    }

    pub fn levels(&self) -> &[i64] {
        &self.levels
    }

    pub fn responses(&self) -> &[bool] {
        &self.responses
    }

    pub fn pretrial_responses(&self) -> &[bool] {
        &self.pretrial_responses
    }

    pub fn config(&self) -> &StaircaseConfig {
        &self.config
    }

    /// Reversal count at which the run finishes.
    pub fn target_reversals(&self) -> usize {
        self.target_reversals
    }

    /// Snapshot of the run with the threshold over the last `threshold_reversals`.
    pub fn summary(&self, threshold_reversals: usize) -> StaircaseSummary {
        StaircaseSummary {
            config: self.config.clone(),
            levels: self.levels.clone(),
            responses: self.responses.clone(),
            pretrial_responses: self.pretrial_responses.clone(),
            reversals: self.reversals.clone(),
            threshold: self.threshold(threshold_reversals),
            finished: self.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n_up: u32, n_down: u32) -> StaircaseConfig {
        StaircaseConfig {
            start_val: 5,
            n_reversals: 3,
            step_sizes: vec![1],
            min_val: 0,
            max_val: 10,
            n_up,
            n_down,
            n_pretrials: 0,
        }
    }

    #[test]
    fn two_down_needs_two_correct() {
        let mut stairs = Staircase::new(config(1, 2)).expect("stairs");
        let first = stairs.add_response(true).expect("response");
        assert_eq!(first.direction, None);
        assert_eq!(first.next_level, 5);
        let second = stairs.add_response(true).expect("response");
        assert_eq!(second.direction, Some(Direction::Down));
        assert_eq!(second.next_level, 4);
    }

    #[test]
    fn incorrect_resets_correct_streak() {
        let mut stairs = Staircase::new(config(2, 2)).expect("stairs");
        stairs.add_response(true).expect("response");
        let outcome = stairs.add_response(false).expect("response");
        assert_eq!(outcome.direction, None);
        let outcome = stairs.add_response(false).expect("response");
        assert_eq!(outcome.direction, Some(Direction::Up));
        assert_eq!(stairs.level(), 6);
    }

    #[test]
    fn first_step_is_never_a_reversal() {
        let mut stairs = Staircase::new(config(1, 1)).expect("stairs");
        let outcome = stairs.add_response(false).expect("response");
        assert!(!outcome.reversal);
        assert!(stairs.reversals().is_empty());
    }

    #[test]
    fn clamping_keeps_intended_direction() {
        let mut stairs = Staircase::new(StaircaseConfig {
            start_val: 10,
            ..config(1, 1)
        })
        .expect("stairs");
        stairs.add_response(false).expect("up at ceiling");
        assert_eq!(stairs.level(), 10);
        let outcome = stairs.add_response(false).expect("up again");
        assert!(!outcome.reversal);
        let outcome = stairs.add_response(true).expect("down");
        assert!(outcome.reversal);
        assert_eq!(stairs.reversals(), &[10]);
    }

    #[test]
    fn threshold_index_rounds_up_and_clamps() {
        let mut stairs = Staircase::new(config(1, 1)).expect("stairs");
        assert_eq!(stairs.threshold_index(2, 11), None);
        stairs.add_response(true).expect("down to 4");
        stairs.add_response(false).expect("reversal at 4, up to 5");
        stairs.add_response(true).expect("reversal at 5, down to 4");
        assert_eq!(stairs.reversals(), &[4, 5]);
        assert_eq!(stairs.threshold(2), Some(4.5));
        assert_eq!(stairs.threshold_index(2, 11), Some(5));
        assert_eq!(stairs.threshold_index(2, 3), Some(2));
        assert_eq!(stairs.threshold_index(2, 0), None);
    }
}
