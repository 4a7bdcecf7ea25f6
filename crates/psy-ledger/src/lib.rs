//! Append-only, flush-on-write results ledger.
//!
//! Each subject owns one JSON-lines file under the results folder. Every entry
//! carries a sequence number, a tag from [`tags`], a UTC timestamp and the
//! payload exactly as it was serialised.

mod ledger;
pub mod tags;

pub use ledger::{ledger_path, read_entries, validate_subject, Ledger, LedgerEntry};
