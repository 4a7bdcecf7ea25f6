use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use psy_core::errors::{ErrorInfo, PsyError};
use psy_core::{
    stable_hash_string, Condition, Dimension, ParameterGrid, RngHandle, SchemaVersion,
    SessionProvenance, StimulusKey,
};
use psy_ledger::{tags, Ledger};
use psy_seq::{Sequence, SequenceKind, SequenceRecord};
use psy_stairs::{Staircase, StaircaseSummary};
use psy_trial::{AudioDevice, Collaborators, OperatorConsole, StimulusStore, TrialRunner};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::config::ExperimentConfig;
use crate::instructions;
use crate::scoring::HitRates;

/// Result of one JND measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JndOutcome {
    pub dimension: Dimension,
    /// Mean of the last reversal levels.
    pub threshold: f64,
    /// Index the threshold maps to in the dimension's value list.
    pub level_index: usize,
    /// Stimulus value perceived as different from the reference.
    pub value: f64,
    pub summary: StaircaseSummary,
}

/// JND stimulus values of the three dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct JndValues {
    pub room: f64,
    pub voice: f64,
    pub itd: f64,
}

impl JndValues {
    pub fn value(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Room => self.room,
            Dimension::Voice => self.voice,
            Dimension::Itd => self.itd,
        }
    }

    fn value_mut(&mut self, dimension: Dimension) -> &mut f64 {
        match dimension {
            Dimension::Room => &mut self.room,
            Dimension::Voice => &mut self.voice,
            Dimension::Itd => &mut self.itd,
        }
    }
}

/// Result of one interference block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockOutcome {
    pub record: SequenceRecord<Condition>,
    pub rates: HitRates,
}

/// Everything a completed session produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub jnd: JndValues,
    pub blocks: Vec<BlockOutcome>,
}

/// The six interference conditions: the reference condition and every
/// combination of room, voice and itd shifted to their JND values.
pub fn interference_conditions(
    grid: &ParameterGrid,
    jnd: &JndValues,
) -> Result<Vec<Condition>, PsyError> {
    let reference = grid.reference_condition()?;
    let room = reference.with_value(Dimension::Room, jnd.room, "room");
    Ok(vec![
        reference.clone(),
        room.clone(),
        room.with_value(Dimension::Voice, jnd.voice, "room_voice"),
        room.with_value(Dimension::Itd, jnd.itd, "room_itd"),
        reference.with_value(Dimension::Voice, jnd.voice, "voice"),
        reference.with_value(Dimension::Itd, jnd.itd, "itd"),
    ])
}

/// Drives a subject through practice, JND measurement and interference blocks.
///
/// Every randomised order is drawn from a named substream of the master seed,
/// so a session replays exactly given the same seed and the same answers.
pub struct ExperimentController<S, D, C> {
    config: ExperimentConfig,
    grid: ParameterGrid,
    ledger: Ledger,
    io: Collaborators<S, D, C>,
    runner: TrialRunner,
    master: RngHandle,
    streams: u64,
}

impl<S, D, C> ExperimentController<S, D, C>
where
    S: StimulusStore,
    D: AudioDevice,
    C: OperatorConsole,
{
    pub fn new(
        config: ExperimentConfig,
        ledger: Ledger,
        io: Collaborators<S, D, C>,
        master: RngHandle,
    ) -> Result<Self, PsyError> {
        config.validate()?;
        let grid = config.grid.to_grid()?;
        let runner = TrialRunner::new(config.isi(), config.input, master.substream("trial order"));
        Ok(Self {
            config,
            grid,
            ledger,
            io,
            runner,
            master,
            streams: 0,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn collaborators(&self) -> &Collaborators<S, D, C> {
        &self.io
    }

    pub fn grid(&self) -> &ParameterGrid {
        &self.grid
    }

    pub fn into_parts(self) -> (Ledger, Collaborators<S, D, C>) {
        (self.ledger, self.io)
    }

    fn next_stream(&mut self, label: &str) -> RngHandle {
        self.streams += 1;
        self.master.substream(&format!("{label}#{}", self.streams))
    }

    fn word_sequence(&mut self) -> Result<Sequence<String>, PsyError> {
        let rng = self.next_stream("words");
        Sequence::new(self.config.words.clone(), SequenceKind::InfiniteCyclic, rng)
    }

    fn show(&mut self, lines: &[&str]) -> Result<(), PsyError> {
        for line in lines {
            self.io.console.display(line)?;
        }
        Ok(())
    }

    fn wait_for(&mut self, message: &str) -> Result<String, PsyError> {
        self.config.input.read_line(&mut self.io.console, message)
    }

    /// Writes the provenance entry that opens a session.
    pub fn write_provenance(&mut self) -> Result<SessionProvenance, PsyError> {
        let provenance = SessionProvenance {
            schema_version: SchemaVersion::default(),
            subject: self.ledger.subject().to_string(),
            seed: self.master.seed(),
            config_hash: stable_hash_string(&self.config)?,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tool_versions: BTreeMap::from([(
                env!("CARGO_PKG_NAME").to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            )]),
        };
        self.ledger.write(&provenance, tags::SESSION)?;
        Ok(provenance)
    }

    /// Runs a JND staircase for `dimension`, repeating it while the operator
    /// answers `r`. Practice runs leave no trace in the ledger.
    pub fn run_jnd(&mut self, dimension: Dimension, practice: bool) -> Result<JndOutcome, PsyError> {
        let span = info_span!("jnd", %dimension, practice);
        let _guard = span.enter();

        self.show(&instructions::jnd(dimension))?;
        self.wait_for(instructions::START_JND)?;

        let values = self.grid.values(dimension)?.to_vec();
        let reference = self.grid.reference_condition()?;
        let plan = if practice {
            self.config.practice.clone()
        } else {
            self.config.measurement.clone()
        };

        loop {
            let mut words = self.word_sequence()?;
            let mut stairs = Staircase::new(plan.to_config(values.len())?)?;
            if !practice {
                self.ledger.write(&format!("{dimension} jnd:"), tags::TIME)?;
            }

            while let Some(level) = stairs.next_level() {
                let value = values[level as usize];
                let target = reference.with_value(dimension, value, dimension.as_str());
                let target_key = StimulusKey::new(words.draw()?, &target);
                let reference_key = StimulusKey::new(words.draw()?, &reference);
                self.runner
                    .present_afc_trial(&target_key, &reference_key, &mut self.io, &mut stairs)?;
            }

            let threshold_reversals = self.config.threshold_reversals;
            let threshold = stairs.threshold(threshold_reversals).ok_or_else(|| {
                PsyError::EndOfSequence(
                    ErrorInfo::new("jnd-no-reversals", "staircase ended without reversals")
                        .with_context("dimension", dimension),
                )
            })?;
            let level_index = stairs
                .threshold_index(threshold_reversals, values.len())
                .unwrap_or(values.len() - 1);
            let outcome = JndOutcome {
                dimension,
                threshold,
                level_index,
                value: values[level_index],
                summary: stairs.summary(threshold_reversals),
            };
            info!(threshold, value = outcome.value, "staircase finished");

            if !practice {
                self.io
                    .console
                    .display(&format!("{dimension} jnd: {threshold:.1}"))?;
                self.ledger.write(&outcome.threshold, &tags::jnd(dimension))?;
                self.ledger
                    .write(&outcome.value, &tags::jnd_condition_value(dimension))?;
                self.ledger
                    .write(&outcome.summary, &tags::jnd_staircase(dimension))?;
            }

            let answer = self.wait_for(instructions::REPEAT_JND)?;
            if answer.trim() != "r" {
                return Ok(outcome);
            }
            info!("repeating threshold measurement");
        }
    }

    /// Runs one block of interference trials against the reference condition.
    pub fn run_interference_block(&mut self, jnd: &JndValues) -> Result<BlockOutcome, PsyError> {
        let span = info_span!("interference_block");
        let _guard = span.enter();

        self.show(&instructions::interference())?;
        self.wait_for(instructions::START_BLOCK)?;

        let conditions = interference_conditions(&self.grid, jnd)?;
        let reference = self.grid.reference_condition()?;
        let rng = self.next_stream("conditions");
        let mut trials = Sequence::new(
            conditions,
            SequenceKind::FinitePermuted {
                n_reps: self.config.interference.n_reps,
            },
            rng,
        )?;
        let mut words = self.word_sequence()?;
        self.ledger.write("interference block:", tags::TIME)?;

        let pause = self.config.after_stim_pause();
        loop {
            let condition = match trials.draw() {
                Ok(condition) => condition,
                Err(PsyError::EndOfSequence(_)) => break,
                Err(err) => return Err(err),
            };
            let target_key = StimulusKey::new(words.draw()?, &condition);
            let reference_key = StimulusKey::new(words.draw()?, &reference);
            self.runner
                .present_afc_trial(&target_key, &reference_key, &mut self.io, &mut trials)?;
            self.io.device.silence(pause)?;
        }

        let record = trials.record();
        let rates = self.config.scoring.score_record(&record);
        self.io
            .console
            .display(&format!("hitrate: {}", rates.hit_rate))?;
        self.io
            .console
            .display(&format!("false alarm rate: {}", rates.false_alarm_rate))?;
        info!(
            hit_rate = rates.hit_rate,
            false_alarm_rate = rates.false_alarm_rate,
            "block scored"
        );
        self.ledger.write(&record, tags::TRIALS)?;
        self.ledger.write(&rates, tags::SCORES)?;
        Ok(BlockOutcome { record, rates })
    }

    /// Full session: provenance, practice and measurement for every dimension,
    /// then the configured number of interference blocks.
    pub fn run_session(&mut self) -> Result<SessionOutcome, PsyError> {
        let span = info_span!("session", subject = %self.ledger.subject(), seed = self.master.seed());
        let _guard = span.enter();

        self.write_provenance()?;
        let mut jnd = JndValues::default();
        for dimension in Dimension::ALL {
            self.run_jnd(dimension, true)?;
            let outcome = self.run_jnd(dimension, false)?;
            *jnd.value_mut(dimension) = outcome.value;
        }

        self.show(&instructions::MAIN_PART)?;
        let mut blocks = Vec::with_capacity(self.config.interference.n_blocks);
        for block in 0..self.config.interference.n_blocks {
            info!(block, "starting interference block");
            blocks.push(self.run_interference_block(&jnd)?);
        }
        Ok(SessionOutcome { jnd, blocks })
    }
}
