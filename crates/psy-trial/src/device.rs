use std::thread;
use std::time::Duration;

use psy_core::errors::PsyError;
use psy_core::StimulusKey;
use tracing::info;

use crate::store::Stimulus;

/// Synchronous audio output.
pub trait AudioDevice {
    /// Plays `stimulus` to completion.
    fn play(&mut self, stimulus: &Stimulus) -> Result<(), PsyError>;

    /// Holds silence for `duration`.
    fn silence(&mut self, duration: Duration) -> Result<(), PsyError>;
}

/// One action taken by a [`LoggingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Play(StimulusKey),
    Silence(Duration),
}

/// Device that logs playback instead of rendering audio.
///
/// Silences are slept through unless the device was built with
/// [`LoggingDevice::instant`].
#[derive(Debug, Clone, Default)]
pub struct LoggingDevice {
    realtime: bool,
    events: Vec<DeviceEvent>,
}

impl LoggingDevice {
    pub fn new() -> Self {
        Self {
            realtime: true,
            events: Vec::new(),
        }
    }

    /// Device that records silences without sleeping.
    pub fn instant() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DeviceEvent] {
        &self.events
    }
}

impl AudioDevice for LoggingDevice {
    fn play(&mut self, stimulus: &Stimulus) -> Result<(), PsyError> {
        info!(stimulus = %stimulus.key, source = %stimulus.source.display(), "play");
        self.events.push(DeviceEvent::Play(stimulus.key.clone()));
        Ok(())
    }

    fn silence(&mut self, duration: Duration) -> Result<(), PsyError> {
        if self.realtime {
            thread::sleep(duration);
        }
        self.events.push(DeviceEvent::Silence(duration));
        Ok(())
    }
}
