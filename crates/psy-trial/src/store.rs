use std::path::{Path, PathBuf};

use psy_core::errors::{ErrorInfo, PsyError};
use psy_core::StimulusKey;
use serde::{Deserialize, Serialize};

/// A resolved, playable stimulus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub key: StimulusKey,
    /// Location of the backing asset.
    pub source: PathBuf,
}

/// Maps structured stimulus keys to playable assets.
pub trait StimulusStore {
    /// Resolves `key`, failing with [`PsyError::StimulusNotFound`] when no asset exists.
    fn resolve(&self, key: &StimulusKey) -> Result<Stimulus, PsyError>;
}

/// Store over a directory of pre-rendered wave files laid out as
/// `<root>/<word>/<word>_SER<voice>_GPR168_<room>_<itd>.wav`.
#[derive(Debug, Clone)]
pub struct WavDirectoryStore {
    root: PathBuf,
}

impl WavDirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a key maps to, whether or not the file exists.
    pub fn path_for(&self, key: &StimulusKey) -> PathBuf {
        let file = format!(
            "{}_SER{}_GPR168_{}_{}.wav",
            key.word,
            format_sig4(key.voice),
            key.room.round() as i64,
            key.itd.round() as i64
        );
        self.root.join(&key.word).join(file)
    }
}

impl StimulusStore for WavDirectoryStore {
    fn resolve(&self, key: &StimulusKey) -> Result<Stimulus, PsyError> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(PsyError::StimulusNotFound(
                ErrorInfo::new("stimulus-missing", "no wave file for stimulus")
                    .with_context("key", key)
                    .with_context("path", path.display())
                    .with_hint("check the stimulus folder layout"),
            ));
        }
        Ok(Stimulus {
            key: key.clone(),
            source: path,
        })
    }
}

/// Formats `value` with four significant digits and no trailing zeros, the way
/// printf's `%.4g` does.
pub fn format_sig4(value: f64) -> String {
    const PRECISION: i32 = 4;
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let rounded = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let exponent: i32 = rounded
        .rsplit('e')
        .next()
        .and_then(|exp| exp.parse().ok())
        .unwrap_or(0);
    if exponent < -4 || exponent >= PRECISION {
        let (mantissa, _) = rounded.split_once('e').unwrap_or((rounded.as_str(), ""));
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs());
    }
    let decimals = (PRECISION - 1 - exponent).max(0) as usize;
    trim_zeros(&format!("{value:.decimals$}")).to_string()
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_printf_g() {
        assert_eq!(format_sig4(0.98), "0.98");
        assert_eq!(format_sig4(1.029), "1.029");
        assert_eq!(format_sig4(1.47), "1.47");
        assert_eq!(format_sig4(1.0), "1");
        assert_eq!(format_sig4(1.23456), "1.235");
        assert_eq!(format_sig4(168.0), "168");
        assert_eq!(format_sig4(12345.0), "1.235e+04");
        assert_eq!(format_sig4(0.0), "0");
    }

    #[test]
    fn builds_nested_wav_path() {
        let store = WavDirectoryStore::new("/stimuli");
        let key = StimulusKey {
            word: "Apor".into(),
            voice: 1.078,
            room: 48.0,
            itd: 120.0,
        };
        assert_eq!(
            store.path_for(&key),
            PathBuf::from("/stimuli/Apor/Apor_SER1.078_GPR168_48_120.wav")
        );
    }
}
