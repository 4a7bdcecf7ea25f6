use std::error::Error;
use std::io;

use clap::{Parser, Subcommand};
use commands::{
    ledger::{self, LedgerArgs},
    sequence::{self, SequenceArgs},
    session::{self, SessionArgs},
    staircase::{self, StaircaseArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "psy-run", about = "Adaptive psychoacoustic procedures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full interactive session for one subject.
    Session(SessionArgs),
    /// Run a staircase against a simulated listener.
    Staircase(StaircaseArgs),
    /// Print a randomised condition order.
    Sequence(SequenceArgs),
    /// Dump the entries of a subject's results ledger.
    Ledger(LedgerArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Session(args) => session::run(&args),
        Command::Staircase(args) => staircase::run(&args),
        Command::Sequence(args) => sequence::run(&args),
        Command::Ledger(args) => ledger::run(&args),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
