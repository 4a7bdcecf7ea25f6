//! Structured error taxonomy shared by every procedure crate.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PsyError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (subject, dimension, path, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint shown to the operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for psychoacoustic sessions.
///
/// Only [`PsyError::EndOfSequence`] and [`PsyError::OperatorInput`] are
/// recoverable; everything else aborts the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PsyError {
    /// Invalid staircase, sequence, grid or session parameters.
    #[error("invalid configuration: {0}")]
    Configuration(ErrorInfo),
    /// A finite sequence or a finished staircase was advanced.
    #[error("end of sequence: {0}")]
    EndOfSequence(ErrorInfo),
    /// The stimulus store could not resolve a key.
    #[error("stimulus not found: {0}")]
    StimulusNotFound(ErrorInfo),
    /// The audio device failed to play or pause.
    #[error("audio device failure: {0}")]
    AudioDevice(ErrorInfo),
    /// The results ledger cannot be created or written.
    #[error("storage unavailable: {0}")]
    Storage(ErrorInfo),
    /// Operator input was missing or not one of the accepted answers.
    #[error("invalid operator input: {0}")]
    OperatorInput(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl PsyError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PsyError::Configuration(info)
            | PsyError::EndOfSequence(info)
            | PsyError::StimulusNotFound(info)
            | PsyError::AudioDevice(info)
            | PsyError::Storage(info)
            | PsyError::OperatorInput(info)
            | PsyError::Serde(info) => info,
        }
    }

    /// Whether the caller may continue the session after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PsyError::EndOfSequence(_) | PsyError::OperatorInput(_)
        )
    }

    /// Shorthand for a configuration error.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        PsyError::Configuration(ErrorInfo::new(code, message))
    }

    /// Shorthand for a serde error wrapping an underlying failure.
    pub fn serde(code: &str, err: impl ToString) -> Self {
        PsyError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}
