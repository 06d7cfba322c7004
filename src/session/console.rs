//! Interactive console menu.
//!
//! Reads from any `BufRead` and writes to any `Write`, so the whole session
//! can be driven from a test with in-memory buffers.

use super::history::{History, HistoryEntry};
use crate::calculator::{
    CalcError, EVALUATE_CHOICE, EXIT_CHOICE, NumberFormat, Operation, catalog,
    copy_to_clipboard, evaluate, evaluate_phrase, looks_like_expression, normalize,
};
use crate::config::Config;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const CHOICE_PROMPT: &str =
    "Enter choice (1-32). You can type 'm' to recall memory, 'h' to show history: ";

/// Whether the loop should keep going after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// Parse a number typed at a prompt: integer first, then float.
pub fn parse_number(raw: &str) -> std::result::Result<f64, CalcError> {
    let trimmed = raw.trim();
    let invalid = || CalcError::InvalidNumber(trimmed.to_string());

    // Imaginary literals are not numbers here.
    if trimmed.is_empty() || trimmed.ends_with(['j', 'J']) {
        return Err(invalid());
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(int as f64);
    }
    trimmed.parse::<f64>().map_err(|_| invalid())
}

/// Console session state: memory slot and history.
pub struct ConsoleSession {
    memory: Option<f64>,
    history: History,
    history_limit: usize,
    phrases: bool,
    format: NumberFormat,
}

impl ConsoleSession {
    pub fn new(config: &Config) -> Self {
        Self {
            memory: None,
            history: History::new(),
            history_limit: config.display.history_limit,
            phrases: config.evaluator.phrases,
            format: config.number_format(),
        }
    }

    pub fn memory(&self) -> Option<f64> {
        self.memory
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        info!("console session started");
        loop {
            print_menu(out)?;
            let Some(choice) = prompt(input, out, CHOICE_PROMPT)? else {
                break;
            };
            let choice = choice.trim();
            if choice.is_empty() {
                continue;
            }

            match self.dispatch(choice, input, out) {
                Ok(Step::Continue) => {}
                Ok(Step::Quit) => break,
                Err(err) => match err.downcast_ref::<CalcError>() {
                    Some(calc_err) => {
                        debug!(choice, error = %calc_err, "command failed");
                        writeln!(out, "Error: {}", calc_err)?;
                    }
                    None => return Err(err),
                },
            }
        }
        info!(entries = self.history.len(), "console session ended");
        Ok(())
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        choice: &str,
        input: &mut R,
        out: &mut W,
    ) -> Result<Step> {
        match choice.to_lowercase().as_str() {
            "h" => return self.show_history(out).map(|_| Step::Continue),
            "m" => {
                match self.memory {
                    Some(value) => writeln!(out, "Memory: {}", self.format.display(value))?,
                    None => writeln!(out, "Memory: empty")?,
                }
                return Ok(Step::Continue);
            }
            "c" => return self.copy_memory(out).map(|_| Step::Continue),
            "q" => {
                writeln!(out, "Goodbye")?;
                return Ok(Step::Quit);
            }
            _ => {}
        }

        if let Ok(key) = choice.parse::<u8>() {
            return match key {
                EXIT_CHOICE => {
                    writeln!(out, "Goodbye")?;
                    Ok(Step::Quit)
                }
                EVALUATE_CHOICE => {
                    let Some(expression) = prompt(input, out, "Enter expression to evaluate: ")?
                    else {
                        return Ok(Step::Quit);
                    };
                    self.evaluate(&expression, out)?;
                    Ok(Step::Continue)
                }
                _ => match catalog::by_key(key) {
                    Some(op) => self.run_operation(op, input, out),
                    None => unknown_choice(out),
                },
            };
        }

        if let Some(op) = catalog::by_name(choice) {
            return self.run_operation(op, input, out);
        }

        // Typed straight at the menu prompt.
        let as_expression = looks_like_expression(choice)
            || (self.phrases && looks_like_expression(&normalize(choice)));
        if as_expression {
            self.evaluate(choice, out)?;
            return Ok(Step::Continue);
        }

        match catalog::search(choice) {
            Some(op) => {
                writeln!(out, "Using {}", op.label)?;
                self.run_operation(op, input, out)
            }
            None => unknown_choice(out),
        }
    }

    fn run_operation<R: BufRead, W: Write>(
        &mut self,
        op: &Operation,
        input: &mut R,
        out: &mut W,
    ) -> Result<Step> {
        let mut args = Vec::with_capacity(op.arity());
        for text in op.prompts() {
            let Some(raw) = prompt(input, out, &text)? else {
                return Ok(Step::Quit);
            };
            args.push(parse_number(&raw)?);
        }

        let result = op.call(&args)?;
        let shown: Vec<String> = args.iter().map(|a| self.format.raw(*a)).collect();
        self.record(op.describe(&shown), result, out)?;
        Ok(Step::Continue)
    }

    fn evaluate<W: Write>(&mut self, expression: &str, out: &mut W) -> Result<()> {
        let value = if self.phrases {
            evaluate_phrase(expression, self.memory)?.1
        } else {
            evaluate(expression, self.memory)?
        };
        self.record(format!("eval({})", expression.trim()), value, out)
    }

    /// Show a result, log it and store it in memory.
    fn record<W: Write>(&mut self, description: String, value: f64, out: &mut W) -> Result<()> {
        writeln!(out, "Result: {}", self.format.display(value))?;
        self.history
            .push(HistoryEntry::new(description, self.format.raw(value)));
        self.memory = Some(value);
        Ok(())
    }

    fn show_history<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "History:")?;
        for (idx, entry) in self.history.recent(self.history_limit).iter().enumerate() {
            writeln!(out, "{}. {}", idx + 1, entry.line())?;
        }
        Ok(())
    }

    fn copy_memory<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(value) = self.memory else {
            writeln!(out, "Memory is empty, nothing to copy")?;
            return Ok(());
        };
        match copy_to_clipboard(&self.format.raw(value)) {
            Ok(()) => writeln!(out, "Copied {} to clipboard", self.format.raw(value))?,
            Err(err) => {
                warn!("clipboard copy failed: {:#}", err);
                writeln!(out, "Could not copy: {:#}", err)?;
            }
        }
        Ok(())
    }
}

fn unknown_choice<W: Write>(out: &mut W) -> Result<Step> {
    writeln!(out, "Unknown choice. Please select a valid option.")?;
    Ok(Step::Continue)
}

fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\nSelect operation:")?;
    for line in catalog::menu_lines() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Print `text` and read one line. `None` means input ended.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> (ConsoleSession, String) {
        run_with(&Config::default(), script)
    }

    fn run_with(config: &Config, script: &str) -> (ConsoleSession, String) {
        let mut session = ConsoleSession::new(config);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        session.run(&mut input, &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("5"), Ok(5.0));
        assert_eq!(parse_number(" -2.5 "), Ok(-2.5));
        assert_eq!(parse_number("1e3"), Ok(1000.0));
        assert!(matches!(parse_number("3j"), Err(CalcError::InvalidNumber(_))));
        assert!(matches!(parse_number("abc"), Err(CalcError::InvalidNumber(_))));
        assert!(matches!(parse_number(""), Err(CalcError::InvalidNumber(_))));
    }

    #[test]
    fn test_binary_operation_updates_memory_and_history() {
        let (session, out) = run("1\n2\n3\nh\n31\n");
        assert!(out.contains("Result: 5"));
        assert!(out.contains("1. add(2, 3) = 5"));
        assert!(out.contains("Goodbye"));
        assert_eq!(session.memory(), Some(5.0));
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let (session, out) = run("4\n1\n0\n7\n-4\n20\n5\n3\n1\n31\n");
        assert!(out.contains("Error: Division by zero"));
        assert!(out.contains("Error: Square root of negative number"));
        assert!(out.contains("Error: min_value cannot be greater than max_value"));
        assert!(out.contains("Goodbye"));
        assert!(session.history().is_empty());
        assert_eq!(session.memory(), None);
    }

    #[test]
    fn test_invalid_number() {
        let (_, out) = run("7\nseven\n31\n");
        assert!(out.contains("Error: Invalid number: seven"));
    }

    #[test]
    fn test_evaluate_with_memory() {
        let (session, out) = run("32\n2 + 2\n32\nM * 3\nm\n31\n");
        assert!(out.contains("Result: 4"));
        assert!(out.contains("Result: 12"));
        assert!(out.contains("Memory: 12"));
        assert_eq!(session.memory(), Some(12.0));
        assert_eq!(session.history().nth_newest(0).unwrap().line(), "eval(M * 3) = 12");
    }

    #[test]
    fn test_expression_typed_at_menu_prompt() {
        let (session, _) = run("sqrt(16) + 1\n");
        assert_eq!(session.memory(), Some(5.0));
    }

    #[test]
    fn test_phrases_when_enabled() {
        let mut config = Config::default();
        config.evaluator.phrases = true;
        let (session, _) = run_with(&config, "32\nmultiply 7 by 8\n31\n");
        assert_eq!(session.memory(), Some(56.0));
    }

    #[test]
    fn test_operation_by_name() {
        let (session, out) = run("factor\n5\n31\n");
        assert!(out.contains("Using Factorial"));
        assert_eq!(session.memory(), Some(120.0));
    }

    #[test]
    fn test_exact_operation_name_wins_over_phrases() {
        let mut config = Config::default();
        config.evaluator.phrases = true;
        let (session, out) = run_with(&config, "log base\n8\n2\n31\n");
        assert!(!out.contains("Error"));
        assert!(!out.contains("Using"));
        assert_eq!(session.memory(), Some(3.0));
        assert_eq!(
            session.history().nth_newest(0).unwrap().line(),
            "log base(8, 2) = 3"
        );
    }

    #[test]
    fn test_clamp_and_memory_recall() {
        let (session, out) = run("m\n20\n15\n0\n10\n31\n");
        assert!(out.contains("Memory: empty"));
        assert!(out.contains("Result: 10"));
        assert_eq!(
            session.history().nth_newest(0).unwrap().line(),
            "clamp(15, 0, 10) = 10"
        );
    }

    #[test]
    fn test_unknown_choice_and_eof() {
        let (_, out) = run("99\n");
        assert!(out.contains("Unknown choice. Please select a valid option."));
        assert!(!out.contains("Goodbye"));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut config = Config::default();
        config.display.history_limit = 2;
        let (_, out) = run_with(&config, "1+1\n2+2\n3+3\nh\n");
        assert!(out.contains("1. eval(2+2) = 4"));
        assert!(out.contains("2. eval(3+3) = 6"));
        assert!(!out.contains("eval(1+1)"));
    }

    #[test]
    fn test_sandbox_escape_is_an_error() {
        let (session, out) = run("32\n__import__('os')\n31\n");
        assert!(out.contains("Error: "));
        assert_eq!(session.memory(), None);
    }
}
