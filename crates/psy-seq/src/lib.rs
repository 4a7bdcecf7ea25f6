//! Randomised orderings of experimental conditions.
//!
//! Two kinds are supported: finite permuted blocks, where every condition occurs
//! exactly `n_reps` times, and infinite cyclic streams used for word tokens.
//! Neither kind ever presents the same element twice in a row unless only one
//! element exists.

mod permute;
mod sequence;

pub use sequence::{Sequence, SequenceKind, SequenceRecord};
