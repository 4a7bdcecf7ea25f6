use psy_core::errors::PsyError;
use psy_core::TrialResponse;
use psy_seq::Sequence;
use psy_stairs::Staircase;

/// Receiver of scored trial responses.
pub trait ResponseSink {
    /// Appends the response of the trial that was just presented.
    fn accept(&mut self, response: TrialResponse) -> Result<(), PsyError>;
}

impl<T: Clone> ResponseSink for Sequence<T> {
    fn accept(&mut self, response: TrialResponse) -> Result<(), PsyError> {
        self.record_response(response)
    }
}

impl ResponseSink for Staircase {
    fn accept(&mut self, response: TrialResponse) -> Result<(), PsyError> {
        self.add_response(response.target_chosen).map(|_| ())
    }
}

impl ResponseSink for Vec<TrialResponse> {
    fn accept(&mut self, response: TrialResponse) -> Result<(), PsyError> {
        self.push(response);
        Ok(())
    }
}
