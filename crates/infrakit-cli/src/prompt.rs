//! Yes/no prompts for the install flow.
//!
//! With the `interactive` feature and a terminal on stdin, questions go
//! through `dialoguer`. Otherwise a line is read from stdin; an empty or
//! unrecognised answer takes the default.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Mutex;

use infrakit_core::{
    application::{ApplicationError, ports::Prompter},
    error::InfrakitResult,
};

/// Pick the best prompter for the current terminal.
pub fn prompter() -> Box<dyn Prompter> {
    #[cfg(feature = "interactive")]
    if io::stdin().is_terminal() {
        return Box::new(DialoguerPrompter);
    }
    Box::new(LinePrompter::new(io::BufReader::new(io::stdin())))
}

#[cfg(feature = "interactive")]
struct DialoguerPrompter;

#[cfg(feature = "interactive")]
impl Prompter for DialoguerPrompter {
    fn confirm(&self, question: &str, default: bool) -> InfrakitResult<bool> {
        dialoguer::Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(|e| {
                ApplicationError::PromptFailed {
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

/// Reads one answer line per question from any `BufRead`.
pub struct LinePrompter<R> {
    input: Mutex<R>,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl<R: BufRead + Send> Prompter for LinePrompter<R> {
    fn confirm(&self, question: &str, default: bool) -> InfrakitResult<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        eprint!("{question} {hint} ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        self.input
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .read_line(&mut line)
            .map_err(|e| ApplicationError::PromptFailed {
                reason: e.to_string(),
            })?;

        Ok(parse_answer(&line).unwrap_or(default))
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn answers_are_case_insensitive() {
        assert_eq!(parse_answer("Y\n"), Some(true));
        assert_eq!(parse_answer(" yes "), Some(true));
        assert_eq!(parse_answer("NO"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
    }

    #[test]
    fn empty_answer_takes_default() {
        let prompter = LinePrompter::new(Cursor::new("\n"));
        assert!(prompter.confirm("Install docker?", true).unwrap());
        let prompter = LinePrompter::new(Cursor::new(""));
        assert!(!prompter.confirm("Install docker?", false).unwrap());
    }

    #[test]
    fn one_line_per_question() {
        let prompter = LinePrompter::new(Cursor::new("n\ny\n"));
        assert!(!prompter.confirm("first?", true).unwrap());
        assert!(prompter.confirm("second?", false).unwrap());
    }
}
