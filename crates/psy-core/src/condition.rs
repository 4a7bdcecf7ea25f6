//! Conditions, stimulus dimensions and the explicit parameter grid.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, PsyError};

/// Independent variable a condition can vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Simulated room size.
    Room,
    /// Voice pitch scale of the speaker.
    Voice,
    /// Interaural time difference in microseconds.
    Itd,
}

impl Dimension {
    /// All dimensions in the order the JND phase measures them.
    pub const ALL: [Dimension; 3] = [Dimension::Room, Dimension::Voice, Dimension::Itd];

    /// Stable lowercase name used in labels and ledger tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Room => "room",
            Dimension::Voice => "voice",
            Dimension::Itd => "itd",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = PsyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "room" => Ok(Dimension::Room),
            "voice" => Ok(Dimension::Voice),
            "itd" => Ok(Dimension::Itd),
            other => Err(PsyError::Configuration(
                ErrorInfo::new("unknown-dimension", "unknown stimulus dimension")
                    .with_context("dimension", other)
                    .with_hint("expected one of room, voice, itd"),
            )),
        }
    }
}

/// Immutable tuple of independent-variable values plus the label naming the
/// variables that differ from the reference condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Voice pitch scale.
    pub voice: f64,
    /// Room size.
    pub room: f64,
    /// Interaural time difference.
    pub itd: f64,
    /// Names the dimensions that differ from the reference condition.
    pub label: String,
}

impl Condition {
    /// Value of a single dimension.
    pub fn value(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Room => self.room,
            Dimension::Voice => self.voice,
            Dimension::Itd => self.itd,
        }
    }

    /// Copy of this condition with one dimension replaced and a new label.
    pub fn with_value(&self, dimension: Dimension, value: f64, label: impl Into<String>) -> Self {
        let mut next = self.clone();
        match dimension {
            Dimension::Room => next.room = value,
            Dimension::Voice => next.voice = value,
            Dimension::Itd => next.itd = value,
        }
        next.label = label.into();
        next
    }
}

/// Ordered list of available stimulus values for every dimension.
///
/// The first value of each list is the reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    values: BTreeMap<Dimension, Vec<f64>>,
}

impl ParameterGrid {
    /// Builds a grid, rejecting dimensions without values.
    pub fn new(values: BTreeMap<Dimension, Vec<f64>>) -> Result<Self, PsyError> {
        let grid = Self { values };
        grid.validate()?;
        Ok(grid)
    }

    /// Checks that every dimension has at least one value.
    pub fn validate(&self) -> Result<(), PsyError> {
        for dimension in Dimension::ALL {
            self.values(dimension)?;
        }
        Ok(())
    }

    /// Ordered value list of a dimension.
    pub fn values(&self, dimension: Dimension) -> Result<&[f64], PsyError> {
        match self.values.get(&dimension) {
            Some(values) if !values.is_empty() => Ok(values),
            _ => Err(PsyError::Configuration(
                ErrorInfo::new("grid-missing-dimension", "parameter grid has no values")
                    .with_context("dimension", dimension),
            )),
        }
    }

    /// Reference value of a dimension.
    pub fn reference_value(&self, dimension: Dimension) -> Result<f64, PsyError> {
        Ok(self.values(dimension)?[0])
    }

    /// The reference condition (all dimensions at their first value).
    pub fn reference_condition(&self) -> Result<Condition, PsyError> {
        Ok(Condition {
            voice: self.reference_value(Dimension::Voice)?,
            room: self.reference_value(Dimension::Room)?,
            itd: self.reference_value(Dimension::Itd)?,
            label: "default".to_string(),
        })
    }
}

/// Structured identity of one playable stimulus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusKey {
    /// Spoken token.
    pub word: String,
    /// Voice pitch scale.
    pub voice: f64,
    /// Room size.
    pub room: f64,
    /// Interaural time difference.
    pub itd: f64,
}

impl StimulusKey {
    /// Key for `word` rendered under the parameters of `condition`.
    pub fn new(word: impl Into<String>, condition: &Condition) -> Self {
        Self {
            word: word.into(),
            voice: condition.voice,
            room: condition.room,
            itd: condition.itd,
        }
    }
}

impl fmt::Display for StimulusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (voice={}, room={}, itd={})",
            self.word, self.voice, self.room, self.itd
        )
    }
}
