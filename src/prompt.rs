//! Interactive yes/no confirmations.
//! The engine asks through the `Prompt` trait; the binary answers from stdin.

use std::io::{self, BufRead, Write};
use std::path::Path;

pub trait Prompt {
    /// Destination file exists: replace it?
    fn confirm_overwrite(&mut self, destination: &Path) -> bool;

    /// Source directory is a partition root: proceed anyway?
    fn confirm_proceed_at_root(&mut self, path: &Path) -> bool;
}

/// "y" / "yes" (any case) is a yes; anything else, including EOF, is a no.
pub fn parse_answer(line: &str) -> bool {
    let answer = line.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Asks on `output`, reads one line per question from `input`.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> bool {
        let _ = write!(self.output, "{question} (y/n) ");
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => parse_answer(&line),
        }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn confirm_overwrite(&mut self, destination: &Path) -> bool {
        self.ask(&format!(
            "Destination file \"{}\" exists. Overwrite?",
            destination.display()
        ))
    }

    fn confirm_proceed_at_root(&mut self, path: &Path) -> bool {
        self.ask(&format!(
            "Source directory \"{}\" to copy/move from is root of the partition. Proceed?",
            path.display()
        ))
    }
}

/// The terminal prompt used by the binary.
pub fn stdin_prompt() -> LinePrompt<io::StdinLock<'static>, io::Stderr> {
    LinePrompt::new(io::stdin().lock(), io::stderr())
}

/// Answers every question the same way (non-interactive runs, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm_overwrite(&mut self, _destination: &Path) -> bool {
        self.0
    }

    fn confirm_proceed_at_root(&mut self, _path: &Path) -> bool {
        self.0
    }
}
