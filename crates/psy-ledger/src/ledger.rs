use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use psy_core::errors::{ErrorInfo, PsyError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, info, warn};

/// One line of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub seq: u64,
    pub tag: String,
    /// RFC 3339 UTC timestamp taken when the entry was written.
    pub timestamp: String,
    /// Payload JSON, byte-identical to what was written.
    pub payload: Box<RawValue>,
}

impl LedgerEntry {
    /// Decodes the payload into `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, PsyError> {
        serde_json::from_str(self.payload.get()).map_err(|err| {
            PsyError::Serde(
                ErrorInfo::new("ledger-payload", err.to_string())
                    .with_context("seq", self.seq)
                    .with_context("tag", &self.tag),
            )
        })
    }
}

/// Open ledger of one subject.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    subject: String,
    file: File,
    next_seq: u64,
}

/// Rejects subject codes that are empty or could escape the results folder.
pub fn validate_subject(subject: &str) -> Result<(), PsyError> {
    let invalid = subject.trim().is_empty()
        || subject.contains(['/', '\\'])
        || subject.contains("..")
        || subject.chars().any(char::is_control);
    if invalid {
        return Err(PsyError::Configuration(
            ErrorInfo::new("subject-invalid", "subject code is not a plain file name")
                .with_context("subject", subject)
                .with_hint("use letters, digits, '-' or '_'"),
        ));
    }
    Ok(())
}

/// Location of the ledger file for `subject` under `root`.
pub fn ledger_path(root: &Path, subject: &str) -> PathBuf {
    root.join(format!("{subject}.jsonl"))
}

fn storage_error(code: &str, path: &Path, err: io::Error) -> PsyError {
    PsyError::Storage(
        ErrorInfo::new(code, err.to_string())
            .with_context("path", path.display())
            .with_hint("sessions never run without a writable results folder"),
    )
}

impl Ledger {
    /// Opens (or creates) the ledger of `subject` under `root` for appending.
    ///
    /// Existing entries are never truncated; sequence numbers continue after
    /// the last readable entry. A line torn by an earlier crash is terminated
    /// so the next entry starts on a fresh line.
    pub fn open(root: impl AsRef<Path>, subject: &str) -> Result<Self, PsyError> {
        validate_subject(subject)?;
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|err| storage_error("ledger-root", root, err))?;
        let path = ledger_path(root, subject);

        let existing = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(storage_error("ledger-read", &path, err)),
        };
        let next_seq = parse_entries(&existing, &path)?
            .last()
            .map_or(0, |entry| entry.seq + 1);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| storage_error("ledger-open", &path, err))?;
        if existing.last().map_or(false, |byte| *byte != b'\n') {
            warn!(path = %path.display(), "terminating torn final ledger line");
            file.write_all(b"\n")
                .and_then(|_| file.sync_data())
                .map_err(|err| storage_error("ledger-write", &path, err))?;
        }
        info!(subject, path = %path.display(), next_seq, "ledger opened");
        Ok(Self {
            path,
            subject: subject.to_string(),
            file,
            next_seq,
        })
    }

    /// Appends one entry and syncs it to disk before returning its sequence
    /// number.
    ///
    /// Finite numbers round-trip exactly. JSON has no encoding for NaN or the
    /// infinities, so those are stored as `null` and read back as `None` or
    /// fail to decode as `f64`.
    pub fn write<T: Serialize + ?Sized>(&mut self, payload: &T, tag: &str) -> Result<u64, PsyError> {
        let payload = serde_json::value::to_raw_value(payload).map_err(|err| {
            PsyError::Serde(ErrorInfo::new("ledger-encode", err.to_string()).with_context("tag", tag))
        })?;
        let entry = LedgerEntry {
            seq: self.next_seq,
            tag: tag.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            payload,
        };
        let mut line = serde_json::to_vec(&entry).map_err(|err| PsyError::serde("ledger-encode", err))?;
        line.push(b'\n');
        self.file
            .write_all(&line)
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.sync_data())
            .map_err(|err| storage_error("ledger-write", &self.path, err))?;
        debug!(seq = entry.seq, tag, "ledger entry written");
        self.next_seq += 1;
        Ok(entry.seq)
    }

    /// All readable entries, in write order.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, PsyError> {
        read_entries(&self.path)
    }

    /// Entries carrying `tag`, in write order.
    pub fn entries_with_tag(&self, tag: &str) -> Result<Vec<LedgerEntry>, PsyError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|entry| entry.tag == tag)
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Sequence number the next entry will receive.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }
}

/// Reads every entry of the ledger file at `path`.
pub fn read_entries(path: &Path) -> Result<Vec<LedgerEntry>, PsyError> {
    let bytes = fs::read(path).map_err(|err| storage_error("ledger-read", path, err))?;
    parse_entries(&bytes, path)
}

fn parse_entries(bytes: &[u8], path: &Path) -> Result<Vec<LedgerEntry>, PsyError> {
    let mut entries = Vec::new();
    for (index, line) in bytes.split(|byte| *byte == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<LedgerEntry>(line) {
            Ok(entry) => entries.push(entry),
            // A line cut short by a crash mid-write.
            Err(err) if err.is_eof() => {
                warn!(path = %path.display(), line = index + 1, "skipping torn ledger line");
            }
            Err(err) => {
                return Err(PsyError::Serde(
                    ErrorInfo::new("ledger-line", err.to_string())
                        .with_context("path", path.display())
                        .with_context("line", index + 1),
                ))
            }
        }
    }
    Ok(entries)
}
