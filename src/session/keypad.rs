//! Keypad calculator: the event handlers behind a button-grid front-end.
//!
//! Holds an input buffer and a result line, turns button presses into edits
//! and evaluates through the phrase normalizer. History is shown newest first.

use super::history::{History, HistoryEntry};
use crate::calculator::{CalcResult, NumberFormat};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

/// Function buttons that insert `name(`.
const FUNCTION_KEYS: &[&str] = &["sqrt", "log", "sin", "cos", "tan"];

/// Button layout, row by row, as a front-end would draw it.
pub const LAYOUT: &[&[&str]] = &[
    &["7", "8", "9", "/", "sqrt"],
    &["4", "5", "6", "*", "pow"],
    &["1", "2", "3", "-", "log"],
    &["0", ".", "%", "+", "sin"],
    &["(", ")", "C", "←", "cos"],
    &["Clear History", "Ans", "=", "tan"],
];

/// A button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// `C`: clear input and result.
    Clear,
    /// `←`: drop the last input character.
    Backspace,
    ClearHistory,
    /// `Ans`: insert the last result.
    Answer,
    /// `=`: evaluate the input.
    Equals,
    /// `pow`: insert a caret.
    Power,
    /// A function button, inserts `name(`.
    Function(&'static str),
    /// Anything else is appended as typed.
    Text(String),
}

impl Key {
    /// Map a button label to its key.
    pub fn from_label(label: &str) -> Self {
        match label {
            "C" => Self::Clear,
            "←" | "BS" => Self::Backspace,
            "Clear History" => Self::ClearHistory,
            "Ans" => Self::Answer,
            "=" => Self::Equals,
            "pow" => Self::Power,
            other => match FUNCTION_KEYS.iter().copied().find(|name| *name == other) {
                Some(name) => Self::Function(name),
                None => Self::Text(other.to_string()),
            },
        }
    }
}

/// State of one keypad window.
#[derive(Debug, Default)]
pub struct KeypadSession {
    input: String,
    result: String,
    memory: Option<f64>,
    history: History,
    format: NumberFormat,
}

impl KeypadSession {
    pub fn new(format: NumberFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The result line: a formatted value, `Error: ...`, or empty.
    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn memory(&self) -> Option<f64> {
        self.memory
    }

    /// History lines, newest first.
    pub fn history_lines(&self) -> Vec<String> {
        self.history.newest_first().map(HistoryEntry::line).collect()
    }

    /// Replace the input, as when the user edits the entry field.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Clear => {
                self.input.clear();
                self.result.clear();
            }
            Key::Backspace => {
                self.input.pop();
            }
            Key::ClearHistory => self.clear_history(),
            Key::Answer => {
                if let Some(value) = self.memory {
                    let text = self.format.raw(value);
                    self.input.push_str(&text);
                }
            }
            Key::Equals => self.calculate(),
            Key::Power => self.input.push('^'),
            Key::Function(name) => {
                self.input.push_str(name);
                self.input.push('(');
            }
            Key::Text(text) => self.input.push_str(&text),
        }
    }

    /// Evaluate the input (the Enter key or `=`).
    ///
    /// On success the result replaces the input so calculations can chain.
    pub fn calculate(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        let outcome = CalcResult::evaluate(&input, self.memory, true, &self.format);
        match HistoryEntry::from_calc_result(&outcome) {
            Some(entry) => {
                self.result = outcome.display().to_string();
                self.history.push(entry);
                self.input = outcome.clipboard().unwrap_or_default().to_string();
                self.memory = outcome.value();
            }
            None => {
                debug!(input = %input, "keypad evaluation failed");
                self.result = format!("Error: {}", outcome.display());
            }
        }
    }

    /// Drive the keypad from line-oriented input until it ends.
    ///
    /// `:KEY` presses a button, `:history` lists entries newest first and
    /// `:pick N` recalls one. Any other line replaces the input and is
    /// calculated. Bad commands are reported and the session carries on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            let line = line.trim();

            match line.strip_prefix(':') {
                Some("history") => {
                    for (idx, entry) in self.history_lines().iter().enumerate() {
                        writeln!(out, "{}. {}", idx, entry)?;
                    }
                    continue;
                }
                Some(command) if command.split_whitespace().next() == Some("pick") => {
                    match command["pick".len()..].trim().parse::<usize>() {
                        Ok(index) if self.select_history(index) => {}
                        Ok(index) => {
                            writeln!(out, "No history entry {}", index)?;
                            continue;
                        }
                        Err(_) => {
                            writeln!(out, "Expected a history index")?;
                            continue;
                        }
                    }
                }
                Some(label) => self.press(Key::from_label(label)),
                None if line.is_empty() => continue,
                None => {
                    self.set_input(line);
                    self.calculate();
                }
            }

            writeln!(out, "{}", self.input)?;
            if !self.result.is_empty() {
                writeln!(out, "= {}", self.result)?;
            }
        }
        Ok(())
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Put the expression of a history entry back into the input.
    /// `index` counts from the newest entry.
    pub fn select_history(&mut self, index: usize) -> bool {
        match self.history.nth_newest(index) {
            Some(entry) => {
                self.input = entry.description.clone();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(session: &mut KeypadSession, labels: &[&str]) {
        for label in labels {
            session.press(Key::from_label(label));
        }
    }

    #[test]
    fn test_key_labels() {
        assert_eq!(Key::from_label("C"), Key::Clear);
        assert_eq!(Key::from_label("←"), Key::Backspace);
        assert_eq!(Key::from_label("sqrt"), Key::Function("sqrt"));
        assert_eq!(Key::from_label("pow"), Key::Power);
        assert_eq!(Key::from_label("7"), Key::Text("7".to_string()));
        for row in LAYOUT {
            for label in *row {
                let _ = Key::from_label(label);
            }
        }
    }

    #[test]
    fn test_buttons_build_and_evaluate() {
        let mut session = KeypadSession::default();
        press_all(&mut session, &["sqrt", "1", "6", ")", "+", "2", "pow", "3"]);
        assert_eq!(session.input(), "sqrt(16)+2^3");
        session.press(Key::Equals);
        assert_eq!(session.result(), "12");
        assert_eq!(session.input(), "12");
        assert_eq!(session.history_lines(), vec!["sqrt(16)+2^3 = 12"]);
    }

    #[test]
    fn test_phrases_and_history_order() {
        let mut session = KeypadSession::default();
        session.set_input("add 4 and 5");
        session.calculate();
        session.set_input("multiply 7 by 8");
        session.calculate();
        assert_eq!(
            session.history_lines(),
            vec!["multiply 7 by 8 = 56", "add 4 and 5 = 9"]
        );
        assert!(session.select_history(1));
        assert_eq!(session.input(), "add 4 and 5");
        assert!(!session.select_history(5));
    }

    #[test]
    fn test_error_keeps_input() {
        let mut session = KeypadSession::default();
        session.set_input("sqrt(-4)");
        session.calculate();
        assert!(session.result().starts_with("Error: "));
        assert_eq!(session.input(), "sqrt(-4)");
        assert!(session.history_lines().is_empty());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut session = KeypadSession::default();
        session.set_input("   ");
        session.calculate();
        assert_eq!(session.result(), "");
        assert!(session.history_lines().is_empty());
    }

    #[test]
    fn test_answer_clear_and_backspace() {
        let mut session = KeypadSession::default();
        session.set_input("6 * 7");
        session.calculate();
        press_all(&mut session, &["C", "Ans", "+", "1"]);
        assert_eq!(session.input(), "42+1");
        session.press(Key::Backspace);
        assert_eq!(session.input(), "42+");
        press_all(&mut session, &["Clear History"]);
        assert!(session.history_lines().is_empty());
    }

    #[test]
    fn test_infinite_result_can_be_recalculated() {
        let mut session = KeypadSession::default();
        session.set_input("inf");
        session.calculate();
        assert_eq!(session.result(), "Infinity");
        assert_eq!(session.input(), "inf");
        session.press(Key::Equals);
        assert_eq!(session.result(), "Infinity");
        assert_eq!(session.memory(), Some(f64::INFINITY));

        session.set_input("-inf");
        session.calculate();
        session.press(Key::Equals);
        assert_eq!(session.result(), "-Infinity");
        press_all(&mut session, &["C", "Ans", "*", "2"]);
        assert_eq!(session.input(), "-inf*2");
    }

    fn run(script: &str) -> (KeypadSession, String) {
        let mut session = KeypadSession::default();
        let mut input = std::io::Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        session.run(&mut input, &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_line_driven_keys_and_history() {
        let (session, out) = run("2+2\n:C\n:sqrt\n:9\n:)\n:=\n:history\n:pick 1\n");
        assert!(out.contains("= 4"));
        assert!(out.contains("sqrt(9)\n"));
        assert!(out.contains("= 3"));
        assert!(out.contains("0. sqrt(9) = 3"));
        assert!(out.contains("1. 2+2 = 4"));
        assert_eq!(session.input(), "2+2");
    }

    #[test]
    fn test_bad_pick_does_not_end_the_session() {
        let (session, out) = run(":pick x\n:pick\n:pick 3\n2+2\n");
        assert_eq!(out.matches("Expected a history index").count(), 2);
        assert!(out.contains("No history entry 3"));
        assert!(out.contains("= 4"));
        assert_eq!(session.memory(), Some(4.0));
    }

    #[test]
    fn test_memory_token_after_lowercasing() {
        let mut session = KeypadSession::default();
        session.set_input("2 + 2");
        session.calculate();
        session.set_input("M * 3");
        session.calculate();
        assert_eq!(session.result(), "12");
    }
}
