//! Provenance and schema descriptors written at the head of every session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of ledger payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance record identifying a session in the results ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionProvenance {
    /// Schema version of the payloads that follow.
    pub schema_version: SchemaVersion,
    /// Subject code the session belongs to.
    pub subject: String,
    /// Master seed every randomised order was derived from.
    pub seed: u64,
    /// Stable hash of the canonical experiment configuration.
    pub config_hash: String,
    /// ISO-8601 timestamp recording when the session started.
    pub created_at: String,
    /// Version map for all tools involved in the session.
    pub tool_versions: BTreeMap<String, String>,
}
