use psy_core::errors::{ErrorInfo, PsyError};
use psy_core::{RngHandle, TrialResponse};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::permute;

/// How a sequence orders and repeats its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequenceKind {
    /// Every condition exactly `n_reps` times in random order, then exhausted.
    FinitePermuted { n_reps: usize },
    /// Endless passes over the conditions, reshuffled after every pass.
    InfiniteCyclic,
}

/// Serializable snapshot of a sequence and the responses collected on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord<T> {
    pub kind: SequenceKind,
    pub conditions: Vec<T>,
    /// Indices into `conditions`, in draw order. Infinite sequences only keep
    /// the draws of their current pass.
    pub order: Vec<usize>,
    /// One entry per completed trial, in presentation order.
    pub responses: Vec<TrialResponse>,
}

/// Ordered, randomised stream of conditions or opaque trial tokens.
///
/// A finite sequence is fully ordered on construction; an infinite one draws a
/// fresh shuffled pass whenever the current pass runs out. Responses are
/// appended by the trial runner in the order trials were presented.
#[derive(Debug, Clone)]
pub struct Sequence<T> {
    conditions: Vec<T>,
    kind: SequenceKind,
    rng: RngHandle,
    order: Vec<usize>,
    cursor: usize,
    n_draws: usize,
    last: Option<usize>,
    responses: Vec<TrialResponse>,
}

impl<T: Clone> Sequence<T> {
    /// Creates a sequence over `conditions`.
    pub fn new(conditions: Vec<T>, kind: SequenceKind, mut rng: RngHandle) -> Result<Self, PsyError> {
        if conditions.is_empty() {
            return Err(PsyError::Configuration(ErrorInfo::new(
                "sequence-empty",
                "a sequence needs at least one condition",
            )));
        }
        let order = match kind {
            SequenceKind::FinitePermuted { n_reps } => {
                if n_reps == 0 {
                    return Err(PsyError::Configuration(
                        ErrorInfo::new("sequence-reps", "n_reps must be at least 1")
                            .with_context("n_reps", n_reps),
                    ));
                }
                permute::permuted_order(conditions.len(), n_reps, &mut rng)
            }
            SequenceKind::InfiniteCyclic => Vec::new(),
        };
        Ok(Self {
            conditions,
            kind,
            rng,
            order,
            cursor: 0,
            n_draws: 0,
            last: None,
            responses: Vec::new(),
        })
    }

    /// Advances the sequence by one position.
    ///
    /// Fails with [`PsyError::EndOfSequence`] once a finite sequence is exhausted.
    pub fn draw(&mut self) -> Result<T, PsyError> {
        let index = self.next_index()?;
        self.n_draws += 1;
        self.last = Some(index);
        Ok(self.conditions[index].clone())
    }

    fn next_index(&mut self) -> Result<usize, PsyError> {
        if self.cursor >= self.order.len() {
            match self.kind {
                SequenceKind::FinitePermuted { .. } => {
                    return Err(PsyError::EndOfSequence(
                        ErrorInfo::new("sequence-exhausted", "finite sequence has no draws left")
                            .with_context("draws", self.n_draws),
                    ));
                }
                SequenceKind::InfiniteCyclic => {
                    self.order =
                        permute::cyclic_block(self.conditions.len(), self.last, &mut self.rng);
                    self.cursor = 0;
                    trace!(draws = self.n_draws, "reshuffled cyclic pool");
                }
            }
        }
        let index = self.order[self.cursor];
        self.cursor += 1;
        Ok(index)
    }

    /// Appends the response collected for the most recent draw.
    pub fn record_response(&mut self, response: TrialResponse) -> Result<(), PsyError> {
        if self.responses.len() >= self.n_draws {
            return Err(PsyError::Configuration(
                ErrorInfo::new("response-without-draw", "more responses than draws")
                    .with_context("draws", self.n_draws),
            ));
        }
        self.responses.push(response);
        Ok(())
    }

    /// Responses collected so far, in presentation order.
    pub fn responses(&self) -> &[TrialResponse] {
        &self.responses
    }

    /// Most recently drawn element.
    pub fn current(&self) -> Option<&T> {
        self.last.map(|index| &self.conditions[index])
    }

    /// Total number of trials, `None` for infinite sequences.
    pub fn n_trials(&self) -> Option<usize> {
        match self.kind {
            SequenceKind::FinitePermuted { n_reps } => Some(self.conditions.len() * n_reps),
            SequenceKind::InfiniteCyclic => None,
        }
    }

    /// Number of draws so far.
    pub fn draws(&self) -> usize {
        self.n_draws
    }

    /// Draws left before exhaustion, `None` for infinite sequences.
    pub fn remaining(&self) -> Option<usize> {
        self.n_trials().map(|total| total - self.n_draws)
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    pub fn conditions(&self) -> &[T] {
        &self.conditions
    }

    /// Snapshot of the draw order and response log.
    pub fn record(&self) -> SequenceRecord<T> {
        SequenceRecord {
            kind: self.kind,
            conditions: self.conditions.clone(),
            order: self.order[..self.cursor].to_vec(),
            responses: self.responses.clone(),
        }
    }
}

impl<T: Clone> Iterator for Sequence<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.draw().ok()
    }
}
