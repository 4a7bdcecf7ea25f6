use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use psy_core::errors::{ErrorInfo, PsyError};
use psy_core::{Dimension, ParameterGrid};
use psy_stairs::StaircaseConfig;
use psy_trial::InputPolicy;
use serde::{Deserialize, Serialize};

use crate::scoring::ScoringRule;

/// YAML-configurable parameters of a full experiment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Available stimulus values per dimension.
    #[serde(default)]
    pub grid: GridConfig,
    /// Spoken tokens cycled through during every phase.
    #[serde(default = "default_words")]
    pub words: Vec<String>,
    /// Inter-stimulus interval in seconds.
    #[serde(default = "default_isi_secs")]
    pub isi_secs: f64,
    /// Pause after each interference trial in seconds.
    #[serde(default = "default_after_stim_pause_secs")]
    pub after_stim_pause_secs: f64,
    /// Staircase used for the practice run of every dimension.
    #[serde(default = "StaircasePlan::practice")]
    pub practice: StaircasePlan,
    /// Staircase used for the measured run of every dimension.
    #[serde(default = "StaircasePlan::measurement")]
    pub measurement: StaircasePlan,
    /// Reversals averaged into the threshold.
    #[serde(default = "default_threshold_reversals")]
    pub threshold_reversals: usize,
    #[serde(default)]
    pub interference: InterferenceConfig,
    #[serde(default)]
    pub scoring: ScoringRule,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    #[serde(default)]
    pub input: InputPolicy,
}

fn default_words() -> Vec<String> {
    ["Aertel", "Apor", "Aucke"].map(String::from).to_vec()
}

fn default_isi_secs() -> f64 {
    0.15
}

fn default_after_stim_pause_secs() -> f64 {
    0.3
}

fn default_threshold_reversals() -> usize {
    6
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            words: default_words(),
            isi_secs: default_isi_secs(),
            after_stim_pause_secs: default_after_stim_pause_secs(),
            practice: StaircasePlan::practice(),
            measurement: StaircasePlan::measurement(),
            threshold_reversals: default_threshold_reversals(),
            interference: InterferenceConfig::default(),
            scoring: ScoringRule::default(),
            output: OutputConfig::default(),
            seed_policy: SeedPolicy::default(),
            input: InputPolicy::default(),
        }
    }
}

/// Stimulus values per dimension; the first entry is the reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_rooms")]
    pub rooms: Vec<f64>,
    #[serde(default = "default_voices")]
    pub voices: Vec<f64>,
    #[serde(default = "default_itds")]
    pub itds: Vec<f64>,
}

fn default_rooms() -> Vec<f64> {
    (40..=160).step_by(8).map(f64::from).collect()
}

fn default_voices() -> Vec<f64> {
    vec![
        0.98, 1.029, 1.078, 1.127, 1.176, 1.225, 1.274, 1.323, 1.372, 1.421, 1.47,
    ]
}

fn default_itds() -> Vec<f64> {
    (0..=400).step_by(40).map(f64::from).collect()
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms(),
            voices: default_voices(),
            itds: default_itds(),
        }
    }
}

impl GridConfig {
    /// Builds the explicit parameter grid.
    pub fn to_grid(&self) -> Result<ParameterGrid, PsyError> {
        let values = BTreeMap::from([
            (Dimension::Room, self.rooms.clone()),
            (Dimension::Voice, self.voices.clone()),
            (Dimension::Itd, self.itds.clone()),
        ]);
        ParameterGrid::new(values)
    }
}

/// Staircase shape expressed relative to the length of a value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaircasePlan {
    /// Start this many levels below the top of the list.
    #[serde(default)]
    pub start_below_top: usize,
    pub n_reversals: usize,
    pub step_sizes: Vec<i64>,
    #[serde(default = "default_rule")]
    pub n_up: u32,
    #[serde(default = "default_rule")]
    pub n_down: u32,
    #[serde(default)]
    pub n_pretrials: usize,
}

fn default_rule() -> u32 {
    1
}

impl StaircasePlan {
    /// Short run starting at the easiest level.
    pub fn practice() -> Self {
        Self {
            start_below_top: 0,
            n_reversals: 5,
            step_sizes: vec![4, 4, 3, 2],
            n_up: 1,
            n_down: 1,
            n_pretrials: 0,
        }
    }

    /// Measured run with two pretrials.
    pub fn measurement() -> Self {
        Self {
            start_below_top: 3,
            n_reversals: 12,
            step_sizes: vec![3, 2, 1],
            n_up: 1,
            n_down: 1,
            n_pretrials: 2,
        }
    }

    /// Concrete staircase over level indices `0..n_values`.
    pub fn to_config(&self, n_values: usize) -> Result<StaircaseConfig, PsyError> {
        if n_values <= self.start_below_top {
            return Err(PsyError::Configuration(
                ErrorInfo::new("plan-start", "value list too short for the staircase start")
                    .with_context("n_values", n_values)
                    .with_context("start_below_top", self.start_below_top),
            ));
        }
        let max_val = n_values as i64 - 1;
        let config = StaircaseConfig {
            start_val: max_val - self.start_below_top as i64,
            n_reversals: self.n_reversals,
            step_sizes: self.step_sizes.clone(),
            min_val: 0,
            max_val,
            n_up: self.n_up,
            n_down: self.n_down,
            n_pretrials: self.n_pretrials,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Interference phase size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterferenceConfig {
    /// Repetitions of each condition per block.
    #[serde(default = "default_n_reps")]
    pub n_reps: usize,
    #[serde(default = "default_n_blocks")]
    pub n_blocks: usize,
}

fn default_n_reps() -> usize {
    10
}

fn default_n_blocks() -> usize {
    10
}

impl Default for InterferenceConfig {
    fn default() -> Self {
        Self {
            n_reps: default_n_reps(),
            n_blocks: default_n_blocks(),
        }
    }
}

/// Where ledgers are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_folder")]
    pub results_folder: PathBuf,
}

fn default_results_folder() -> PathBuf {
    PathBuf::from("Results")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_folder: default_results_folder(),
        }
    }
}

/// Master seed selection. Without a seed one is drawn from the OS and recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeedPolicy {
    #[serde(default)]
    pub master_seed: Option<u64>,
}

impl ExperimentConfig {
    /// Checks every section, including that each staircase plan fits the grid.
    pub fn validate(&self) -> Result<(), PsyError> {
        let grid = self.grid.to_grid()?;
        if self.words.is_empty() {
            return Err(PsyError::config("config-words", "at least one word is required"));
        }
        for (name, secs) in [
            ("isi_secs", self.isi_secs),
            ("after_stim_pause_secs", self.after_stim_pause_secs),
        ] {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(PsyError::Configuration(
                    ErrorInfo::new("config-duration", "durations must be finite, non-negative and representable")
                        .with_context("field", name)
                        .with_context("value", secs),
                ));
            }
        }
        for dimension in Dimension::ALL {
            let n_values = grid.values(dimension)?.len();
            for plan in [&self.practice, &self.measurement] {
                plan.to_config(n_values).map_err(|err| {
                    let mut info = err.info().clone();
                    info.context.insert("dimension".into(), dimension.to_string());
                    PsyError::Configuration(info)
                })?;
            }
        }
        if self.threshold_reversals == 0 {
            return Err(PsyError::config(
                "config-threshold",
                "threshold_reversals must be at least 1",
            ));
        }
        if self.interference.n_reps == 0 || self.interference.n_blocks == 0 {
            return Err(PsyError::Configuration(
                ErrorInfo::new("config-interference", "n_reps and n_blocks must be at least 1")
                    .with_context("n_reps", self.interference.n_reps)
                    .with_context("n_blocks", self.interference.n_blocks),
            ));
        }
        if self.input.max_consecutive_eof == 0 {
            return Err(PsyError::config(
                "config-input",
                "max_consecutive_eof must be at least 1",
            ));
        }
        Ok(())
    }

    /// Inter-stimulus interval. Unrepresentable values, which `validate`
    /// rejects, read as zero.
    pub fn isi(&self) -> Duration {
        Duration::try_from_secs_f64(self.isi_secs).unwrap_or_default()
    }

    pub fn after_stim_pause(&self) -> Duration {
        Duration::try_from_secs_f64(self.after_stim_pause_secs).unwrap_or_default()
    }
}

fn io_error(code: &str, path: &Path, err: impl ToString) -> PsyError {
    PsyError::Serde(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}

/// Loads and validates an experiment configuration from YAML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig, PsyError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| io_error("config-read", path, err))?;
    let config: ExperimentConfig =
        serde_yaml::from_slice(&bytes).map_err(|err| io_error("config-parse", path, err))?;
    config.validate()?;
    Ok(config)
}
