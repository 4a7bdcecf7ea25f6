use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use psy_core::{PsyError, RngHandle};
use psy_exp::{load_config, ExperimentConfig, ExperimentController};
use psy_ledger::{validate_subject, Ledger};
use psy_trial::{
    Collaborators, InputPolicy, LoggingDevice, OperatorConsole, TerminalConsole, WavDirectoryStore,
};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Subject code; prompted for when absent.
    #[arg(long)]
    pub subject: Option<String>,
    /// YAML experiment configuration. Built-in defaults are used when absent.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Folder holding the pre-rendered stimuli.
    #[arg(long, default_value = "Stimuli")]
    pub stimuli: PathBuf,
    /// Results folder overriding the configured one.
    #[arg(long)]
    pub results: Option<PathBuf>,
}

pub fn run(args: &SessionArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(results) = &args.results {
        config.output.results_folder = results.clone();
    }

    let mut console = TerminalConsole::stdio();
    let subject = match &args.subject {
        Some(subject) => subject.clone(),
        None => prompt_subject(&config.input, &mut console)?,
    };

    let ledger = Ledger::open(&config.output.results_folder, &subject)?;
    let master = match config.seed_policy.master_seed {
        Some(seed) => RngHandle::from_seed(seed),
        None => RngHandle::from_entropy(),
    };
    info!(subject = %subject, seed = master.seed(), ledger = %ledger.path().display(), "starting session");

    let io = Collaborators::new(
        WavDirectoryStore::new(&args.stimuli),
        LoggingDevice::new(),
        console,
    );
    let mut controller = ExperimentController::new(config, ledger, io, master)?;
    let outcome = controller.run_session()?;

    let (_, mut io) = controller.into_parts();
    io.console.display(&format!(
        "Session complete: room {} / voice {} / itd {} over {} blocks.",
        outcome.jnd.room,
        outcome.jnd.voice,
        outcome.jnd.itd,
        outcome.blocks.len()
    ))?;
    Ok(())
}

const SUBJECT_PROMPT: &str = "Enter subject code: ";

/// Asks for a subject code until the operator types a usable one.
fn prompt_subject<C: OperatorConsole>(policy: &InputPolicy, console: &mut C) -> Result<String, PsyError> {
    loop {
        let subject = policy.read_line(console, SUBJECT_PROMPT)?.trim().to_string();
        match validate_subject(&subject) {
            Ok(()) => return Ok(subject),
            Err(err) => {
                warn!(subject = %subject, "rejected subject code");
                console.display(&format!("Invalid subject code: {}", err.info().message))?;
            }
        }
    }
}
