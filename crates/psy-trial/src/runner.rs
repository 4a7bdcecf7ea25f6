use std::time::Duration;

use psy_core::errors::{ErrorInfo, PsyError};
use psy_core::{Position, RngHandle, StimulusKey, TrialResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::console::OperatorConsole;
use crate::device::AudioDevice;
use crate::sink::ResponseSink;
use crate::store::StimulusStore;

/// Prompt shown while waiting for the listener's answer.
pub const RESPONSE_PROMPT: &str = "Press 1 for first, 2 for second: ";

/// How the runner treats missing operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPolicy {
    /// End-of-input events tolerated in a row before the trial fails.
    pub max_consecutive_eof: usize,
}

impl InputPolicy {
    /// Prompts until a line arrives, tolerating up to `max_consecutive_eof - 1`
    /// end-of-input events in a row.
    pub fn read_line<C: OperatorConsole + ?Sized>(
        &self,
        console: &mut C,
        message: &str,
    ) -> Result<String, PsyError> {
        let mut eof_run = 0;
        loop {
            if let Some(line) = console.prompt(message)? {
                return Ok(line);
            }
            eof_run += 1;
            if eof_run >= self.max_consecutive_eof {
                return Err(PsyError::OperatorInput(
                    ErrorInfo::new("input-closed", "no response received from the operator")
                        .with_context("consecutive_eof", eof_run)
                        .with_hint("answers are read from standard input"),
                ));
            }
            warn!(eof_run, "end of input while waiting for the operator");
        }
    }
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_eof: 3,
        }
    }
}

/// The I/O capabilities a session runs trials against.
#[derive(Debug)]
pub struct Collaborators<S, D, C> {
    pub store: S,
    pub device: D,
    pub console: C,
}

impl<S, D, C> Collaborators<S, D, C>
where
    S: StimulusStore,
    D: AudioDevice,
    C: OperatorConsole,
{
    pub fn new(store: S, device: D, console: C) -> Self {
        Self {
            store,
            device,
            console,
        }
    }
}

/// Presents 2AFC trials with a fixed inter-stimulus interval.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    isi: Duration,
    policy: InputPolicy,
    rng: RngHandle,
}

impl TrialRunner {
    /// `rng` decides the presentation order of every trial.
    pub fn new(isi: Duration, policy: InputPolicy, rng: RngHandle) -> Self {
        Self { isi, policy, rng }
    }

    pub fn isi(&self) -> Duration {
        self.isi
    }

    /// Plays `target` and `reference` in random order, collects the listener's
    /// choice and hands the scored response to `sink`.
    ///
    /// Both stimuli are resolved before anything is played, so a missing asset
    /// aborts the trial without sound.
    pub fn present_afc_trial<S, D, C>(
        &mut self,
        target: &StimulusKey,
        reference: &StimulusKey,
        io: &mut Collaborators<S, D, C>,
        sink: &mut dyn ResponseSink,
    ) -> Result<TrialResponse, PsyError>
    where
        S: StimulusStore,
        D: AudioDevice,
        C: OperatorConsole,
    {
        let target_stim = io.store.resolve(target)?;
        let reference_stim = io.store.resolve(reference)?;

        let target_position = if self.rng.coin() {
            Position::First
        } else {
            Position::Second
        };
        let (first, second) = match target_position {
            Position::First => (&target_stim, &reference_stim),
            Position::Second => (&reference_stim, &target_stim),
        };
        io.device.play(first)?;
        io.device.silence(self.isi)?;
        io.device.play(second)?;

        let chosen = self.collect_choice(&mut io.console)?;
        let response = TrialResponse::score(target_position, chosen);
        debug!(
            target = %target,
            target_position = %target_position,
            chosen = %chosen,
            correct = response.target_chosen,
            "trial complete"
        );
        sink.accept(response)?;
        Ok(response)
    }

    fn collect_choice<C: OperatorConsole>(&self, console: &mut C) -> Result<Position, PsyError> {
        loop {
            let line = self.policy.read_line(console, RESPONSE_PROMPT)?;
            match Position::from_key(&line) {
                Some(position) => return Ok(position),
                None => {
                    debug!(input = %line, "rejected response");
                    console.display("Please answer 1 or 2.")?;
                }
            }
        }
    }
}
