use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::*;

/// A line consisting of this marker ends a multiline block.
pub const BLOCK_TERMINATOR: &str = ".";

/// Interactive input used by every prompt of the generator.
pub trait Prompter {
    /// Shows `prompt` and reads one line without its terminator.
    ///
    /// Returns `None` when the input stream is exhausted.
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;

    fn message(&mut self, text: &str) -> std::io::Result<()>;

    /// Asks a question with a default answer. An empty answer accepts the default.
    fn ask(&mut self, prompt: &str, default: &str) -> Result<String> {
        let line = self
            .read_line(&format!("{prompt} [{default}]: "))?
            .ok_or(Cancelled)?;

        Ok(if line.is_empty() {
            default.to_owned()
        } else {
            line
        })
    }

    /// Reads raw lines until [`BLOCK_TERMINATOR`].
    fn read_block(&mut self, instruction: &str) -> Result<Vec<String>> {
        self.message(instruction)?;
        let mut lines = Vec::with_capacity(16);
        loop {
            let line = self.read_line("> ")?.ok_or(Cancelled)?;
            if line == BLOCK_TERMINATOR {
                return Ok(lines);
            }
            lines.push(line);
        }
    }
}

pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn message(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }
}

/// Replays prepared answers and records everything it was asked.
///
/// The input is considered exhausted once all answers are consumed.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub messages: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.prompts.push(prompt.to_owned());
        Ok(self.answers.pop_front())
    }

    fn message(&mut self, text: &str) -> std::io::Result<()> {
        self.messages.push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_takes_default() {
        let mut prompter = ScriptedPrompter::new(["", "y = 1"]);
        assert_eq!(prompter.ask("Name", "x").unwrap(), "x");
        assert_eq!(prompter.ask("Init", "0").unwrap(), "y = 1");
        assert_eq!(prompter.prompts, ["Name [x]: ", "Init [0]: "]);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut prompter = ScriptedPrompter::default();
        let error = prompter.ask("Name", "x").unwrap_err();
        assert!(is_cancelled(&error));
    }

    #[test]
    fn block_stops_at_terminator() {
        let mut prompter = ScriptedPrompter::new(["a();", "", " .", ".", "rest"]);
        let lines = prompter.read_block("Paste:").unwrap();
        assert_eq!(lines, ["a();", "", " ."]);
        assert_eq!(prompter.remaining(), 1);
        assert_eq!(prompter.messages, ["Paste:"]);
    }

    #[test]
    fn block_without_terminator_cancels() {
        let mut prompter = ScriptedPrompter::new(["a();"]);
        let error = prompter.read_block("Paste:").unwrap_err();
        assert!(is_cancelled(&error));
    }

    #[test]
    fn stdio_strips_line_endings() {
        let input = b"first\r\n\nlast" as &[u8];
        let mut output = Vec::new();
        let mut prompter = StdioPrompter::new(input, &mut output);

        assert_eq!(prompter.read_line("? ").unwrap().as_deref(), Some("first"));
        assert_eq!(prompter.ask("Q", "d").unwrap(), "d");
        assert_eq!(prompter.read_line("? ").unwrap().as_deref(), Some("last"));
        assert_eq!(prompter.read_line("? ").unwrap(), None);
        drop(prompter);

        assert_eq!(String::from_utf8(output).unwrap(), "? Q [d]: ? ? ");
    }
}
