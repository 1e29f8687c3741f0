//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Styled, verbosity-filtered output
//! - This module - Interactive confirmation

use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::Result;

pub mod formatter;

pub use formatter::{Reporter, Verbosity};

/// Outcome of a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Nobody can answer (no terminal, or input closed)
    Unavailable,
}

/// Source of confirmations for overwriting files.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<Answer>;
}

/// Asks on the terminal; answers `Unavailable` when stdin is not a terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, prompt: &str) -> Result<Answer> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Ok(Answer::Unavailable);
        }
        ask(prompt, &mut stdin.lock(), &mut io::stderr())
    }
}

/// Ask `prompt` until a valid answer is read.
///
/// Accepts "y"/"yes" and "n"/"no" (case-insensitive); end of input yields
/// `Unavailable`.
pub fn ask<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<Answer> {
    loop {
        write!(output, "{} [y,n]: ", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(Answer::Unavailable);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Answer::Yes),
            "n" | "no" => return Ok(Answer::No),
            other => writeln!(output, "'{}' is not a valid option", other)?,
        }
    }
}

/// Gives the same answer every time and remembers what was asked.
#[derive(Debug)]
pub struct FixedAnswer {
    answer: Answer,
    pub asked: Vec<String>,
}

impl FixedAnswer {
    pub fn new(answer: Answer) -> Self {
        FixedAnswer {
            answer,
            asked: Vec::new(),
        }
    }
}

impl Confirm for FixedAnswer {
    fn confirm(&mut self, prompt: &str) -> Result<Answer> {
        self.asked.push(prompt.to_string());
        Ok(self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (Answer, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let answer = ask("Overwrite existing file setup.py?", &mut reader, &mut out).unwrap();
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_ask_yes() {
        assert_eq!(run("y\n").0, Answer::Yes);
        assert_eq!(run("YES\n").0, Answer::Yes);
    }

    #[test]
    fn test_ask_no() {
        assert_eq!(run("n\n").0, Answer::No);
        assert_eq!(run("No\n").0, Answer::No);
    }

    #[test]
    fn test_ask_repeats_on_invalid_input() {
        let (answer, output) = run("maybe\ny\n");
        assert_eq!(answer, Answer::Yes);
        assert!(output.contains("'maybe' is not a valid option"));
        assert_eq!(output.matches("[y,n]").count(), 2);
    }

    #[test]
    fn test_ask_end_of_input() {
        assert_eq!(run("").0, Answer::Unavailable);
        assert_eq!(run("what\n").0, Answer::Unavailable);
    }

    #[test]
    fn test_fixed_answer_records_prompts() {
        let mut prompt = FixedAnswer::new(Answer::No);
        assert_eq!(prompt.confirm("first?").unwrap(), Answer::No);
        assert_eq!(prompt.confirm("second?").unwrap(), Answer::No);
        assert_eq!(prompt.asked, vec!["first?", "second?"]);
    }
}
