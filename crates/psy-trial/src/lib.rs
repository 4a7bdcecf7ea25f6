//! Two-alternative forced-choice trials and the collaborators they drive.
//!
//! A trial resolves two [`StimulusKey`](psy_core::StimulusKey)s through a
//! [`StimulusStore`], plays them in random order on an [`AudioDevice`] with an
//! inter-stimulus interval, and blocks on the [`OperatorConsole`] until the
//! listener's answer is entered.

pub mod console;
pub mod device;
pub mod runner;
pub mod sink;
pub mod store;

pub use console::{OperatorConsole, ScriptedConsole, TerminalConsole};
pub use device::{AudioDevice, DeviceEvent, LoggingDevice};
pub use runner::{Collaborators, InputPolicy, TrialRunner, RESPONSE_PROMPT};
pub use sink::ResponseSink;
pub use store::{format_sig4, Stimulus, StimulusStore, WavDirectoryStore};
