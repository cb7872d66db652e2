//! Confirmation providers gating destructive actions.
//!
//! The orchestrator never reads the terminal itself; it asks a
//! [`Confirmer`]. Production uses [`PromptConfirmer::stdio`], tests use
//! [`ScriptedConfirmer`] or a [`PromptConfirmer`] over in-memory buffers.

use std::io::{self, BufRead, Write};

/// Prompt shown before duplicates are deleted.
pub const DELETE_PROMPT: &str =
    "WARNING: deleting duplicated files is enabled. Do you want to continue ? (y/N) ";

/// A capability that answers yes/no questions.
pub trait Confirmer {
    /// Ask the question and return whether it was confirmed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the answer cannot be read.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Whether a raw answer line confirms.
///
/// Only `y` confirms. The line terminator is stripped; no other trimming or
/// case folding is applied.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.strip_suffix('\n').unwrap_or(answer);
    let answer = answer.strip_suffix('\r').unwrap_or(answer);
    answer == "y"
}

/// Confirmer that writes the prompt and reads one line of input.
#[derive(Debug)]
pub struct PromptConfirmer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmer<R, W> {
    /// Create a confirmer over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output stream, mostly useful in tests.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl PromptConfirmer<io::StdinLock<'static>, io::Stderr> {
    /// Confirmer reading stdin and prompting on stderr, keeping stdout for the report.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirmer for PromptConfirmer<R, W> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;

        let confirmed = is_affirmative(&answer);
        log::debug!("Confirmation answer {:?} -> {}", answer.trim_end(), confirmed);
        Ok(confirmed)
    }
}

/// Confirmer with a fixed answer that records how often it was asked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirmer {
    answer: bool,
    asked: usize,
}

impl ScriptedConfirmer {
    /// Always answer `answer`.
    #[must_use]
    pub fn new(answer: bool) -> Self {
        Self { answer, asked: 0 }
    }

    /// Number of prompts seen so far.
    #[must_use]
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        self.asked += 1;
        Ok(self.answer)
    }
}
