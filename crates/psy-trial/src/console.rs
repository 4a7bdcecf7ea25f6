use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use psy_core::errors::{ErrorInfo, PsyError};

/// Line-oriented operator interaction.
pub trait OperatorConsole {
    /// Shows `message` and blocks for one line of input. `Ok(None)` signals
    /// end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>, PsyError>;

    /// Shows an informational message.
    fn display(&mut self, message: &str) -> Result<(), PsyError>;
}

/// Console over any reader/writer pair, stdin/stdout by default.
#[derive(Debug)]
pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
}

impl TerminalConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn console_error(err: io::Error) -> PsyError {
    PsyError::OperatorInput(ErrorInfo::new("console-io", err.to_string()))
}

impl<R: BufRead, W: Write> OperatorConsole for TerminalConsole<R, W> {
    fn prompt(&mut self, message: &str) -> Result<Option<String>, PsyError> {
        write!(self.output, "{message}").map_err(console_error)?;
        self.output.flush().map_err(console_error)?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(console_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn display(&mut self, message: &str) -> Result<(), PsyError> {
        writeln!(self.output, "{message}").map_err(console_error)
    }
}

/// Console that replays queued answers and captures everything shown.
///
/// Once the queue is empty every prompt reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<Option<String>>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|answer| Some(answer.into())).collect(),
            transcript: Vec::new(),
        }
    }

    /// Queues another answer.
    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(Some(answer.into()));
    }

    /// Queues an end-of-input event.
    pub fn push_eof(&mut self) {
        self.answers.push_back(None);
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Prompts and displayed messages, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}

impl OperatorConsole for ScriptedConsole {
    fn prompt(&mut self, message: &str) -> Result<Option<String>, PsyError> {
        self.transcript.push(message.to_string());
        Ok(self.answers.pop_front().flatten())
    }

    fn display(&mut self, message: &str) -> Result<(), PsyError> {
        self.transcript.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_reads_lines_until_eof() {
        let mut console = TerminalConsole::new("2\r\nr\n".as_bytes(), Vec::new());
        assert_eq!(console.prompt("> ").unwrap(), Some("2".to_string()));
        assert_eq!(console.prompt("> ").unwrap(), Some("r".to_string()));
        assert_eq!(console.prompt("> ").unwrap(), None);
        console.display("done").unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "> > > done\n");
    }

    #[test]
    fn scripted_replays_and_records() {
        let mut console = ScriptedConsole::new(["1"]);
        console.push_eof();
        console.push("2");
        assert_eq!(console.prompt("a").unwrap(), Some("1".into()));
        assert_eq!(console.prompt("b").unwrap(), None);
        assert_eq!(console.prompt("c").unwrap(), Some("2".into()));
        assert_eq!(console.prompt("d").unwrap(), None);
        assert_eq!(console.transcript(), &["a", "b", "c", "d"]);
    }
}
