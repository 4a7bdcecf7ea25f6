use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use psy_ledger::{ledger_path, read_entries, validate_subject};

#[derive(Args, Debug)]
pub struct LedgerArgs {
    #[arg(long, default_value = "Results")]
    pub results: PathBuf,
    #[arg(long)]
    pub subject: String,
    /// Only print entries with this tag.
    #[arg(long)]
    pub tag: Option<String>,
}

pub fn run(args: &LedgerArgs) -> Result<(), Box<dyn Error>> {
    validate_subject(&args.subject)?;
    let entries = read_entries(&ledger_path(&args.results, &args.subject))?;
    for entry in entries
        .iter()
        .filter(|entry| args.tag.as_deref().map_or(true, |tag| entry.tag == tag))
    {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}
