//! Room/voice interference experiment: JND staircases followed by blocks of
//! constant-stimuli interference trials.

pub mod config;
pub mod controller;
pub mod instructions;
pub mod scoring;

pub use config::{
    load_config, ExperimentConfig, GridConfig, InterferenceConfig, OutputConfig, SeedPolicy,
    StaircasePlan,
};
pub use controller::{
    interference_conditions, BlockOutcome, ExperimentController, JndOutcome, JndValues,
    SessionOutcome,
};
pub use scoring::{Denominator, HitRates, ScoringRule};
