//! Number formatting for display, history and clipboard.

use serde::{Deserialize, Serialize};

/// How results are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Decimal places kept for non-integral values.
    pub precision: usize,
    /// Group the integer part with commas in display output.
    pub thousand_separators: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: 12,
            thousand_separators: false,
        }
    }
}

/// Integral values below this magnitude print without a fractional part.
const INTEGER_LIMIT: f64 = 1e15;

impl NumberFormat {
    /// Format for display, honouring `thousand_separators`.
    pub fn display(&self, value: f64) -> String {
        if value.is_infinite() {
            let text = if value.is_sign_positive() { "Infinity" } else { "-Infinity" };
            return text.to_string();
        }
        let raw = self.raw(value);
        if !self.thousand_separators || value.is_nan() || raw.contains('e') {
            return raw;
        }

        let (sign, unsigned) = match raw.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", raw.as_str()),
        };
        match unsigned.split_once('.') {
            Some((int_part, dec_part)) => {
                format!("{}{}.{}", sign, group_thousands(int_part), dec_part)
            }
            None => format!("{}{}", sign, group_thousands(unsigned)),
        }
    }

    /// Format without separators, suitable for re-entry and the clipboard.
    ///
    /// Infinities use the `inf` constant so the text evaluates back to the
    /// same value.
    pub fn raw(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            let text = if value.is_sign_positive() { "inf" } else { "-inf" };
            return text.to_string();
        }

        if value.fract() == 0.0 && value.abs() < INTEGER_LIMIT {
            // `as i64` also folds -0.0 into 0.
            return format!("{}", value as i64);
        }
        if value.abs() >= INTEGER_LIMIT {
            return format!("{:e}", value);
        }

        let formatted = format!("{:.*}", self.precision, value);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        match trimmed {
            "-0" | "" => "0".to_string(),
            other => other.to_string(),
        }
    }
}

/// Insert a comma every three digits of an unsigned digit string.
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
