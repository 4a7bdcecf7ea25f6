#![deny(missing_docs)]
#![doc = "Core types, error taxonomy and deterministic seeding shared by the psychoacoustic procedure crates."]

pub mod condition;
pub mod errors;
pub mod provenance;
pub mod response;
pub mod rng;
pub mod serde;

pub use condition::{Condition, Dimension, ParameterGrid, StimulusKey};
pub use errors::{ErrorInfo, PsyError};
pub use provenance::{SchemaVersion, SessionProvenance};
pub use response::{Position, TrialResponse};
pub use rng::{derive_substream_seed, RngHandle};
pub use self::serde::{stable_hash_string, to_canonical_json_bytes};
