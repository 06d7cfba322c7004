//! Best-effort rewriting of informal English math phrases.
//!
//! `"subtract 9 from 20"` becomes `"(20 - 9)"`, `"sin 30"` becomes `"sin(30)"`
//! and so on. Normalization only rewrites text; malformed phrases are left for
//! the evaluator to reject.

use lazy_static::lazy_static;
use regex::Regex;

/// Operand accepted by the sentence patterns: a word, number or call.
const OPERAND: &str = r"[\w\.\(\)]+";

/// Function names that may be written without parentheses (`sqrt 16`).
const BARE_CALL_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sqrt", "log", "log10",
];

lazy_static! {
    /// Sentence forms, applied in order before anything else.
    static ref SENTENCES: Vec<(Regex, &'static str)> = vec![
        (compile(&format!(r"subtract\s+({OPERAND})\s+from\s+({OPERAND})")), "(${2} - ${1})"),
        (compile(&format!(r"add\s+({OPERAND})\s+and\s+({OPERAND})")), "(${1} + ${2})"),
        (compile(&format!(r"multiply\s+({OPERAND})\s+by\s+({OPERAND})")), "(${1} * ${2})"),
        (compile(&format!(r"divide\s+({OPERAND})\s+by\s+({OPERAND})")), "(${1} / ${2})"),
        (compile(&format!(r"({OPERAND})\s+percent\s+of\s+({OPERAND})")), "(${1} * ${2} / 100)"),
    ];

    static ref FILLER: Regex = compile(r"\b(what is|calculate|compute|please)\b|=");

    static ref POWER: Regex = compile(&format!(
        r"power\s+({OPERAND})\s+(?:to|by|and)\s+({OPERAND})"
    ));

    /// Standalone connectives; multi-word forms come before their prefixes.
    static ref WORDS: Vec<(Regex, &'static str)> = [
        (r"\band\b", "+"),
        (r"\bplus\b", "+"),
        (r"\bminus\b", "-"),
        (r"\btimes\b", "*"),
        (r"\bmultiplied by\b", "*"),
        (r"\bover\b", "/"),
        (r"\bdivided by\b", "/"),
        (r"\bdivide\b", "/"),
        (r"\badd\b", "+"),
        (r"\bsubtract\b", "-"),
        (r"\bpower\b", "**"),
        (r"\bpercent\b", "%"),
    ]
    .into_iter()
    .map(|(pattern, symbol)| (compile(pattern), symbol))
    .collect();

    static ref BARE_CALLS: Vec<(Regex, String)> = BARE_CALL_FUNCTIONS
        .iter()
        .map(|name| (compile(&format!(r"\b{name}\s+([-\w\.\(\)]+)")), format!("{name}(${{1}})")))
        .collect();

    static ref WHITESPACE: Regex = compile(r"\s+");
}

/// Compile one of the fixed patterns above. They are literals, so failure is a
/// programming error caught by the tests.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Rewrite `text` into canonical infix form.
///
/// Returns the trimmed original text if the rewrite leaves nothing behind, and
/// an empty string for blank input. Never evaluates anything.
pub fn normalize(text: &str) -> String {
    let original = text.trim();
    if original.is_empty() {
        return String::new();
    }

    let mut s = original.to_lowercase();

    for (pattern, replacement) in SENTENCES.iter() {
        s = pattern.replace_all(&s, *replacement).into_owned();
    }

    s = FILLER.replace_all(&s, "").into_owned();
    s = POWER.replace_all(&s, "(${1} ** ${2})").into_owned();

    for (pattern, symbol) in WORDS.iter() {
        s = pattern.replace_all(&s, *symbol).into_owned();
    }

    for (pattern, replacement) in BARE_CALLS.iter() {
        s = pattern.replace_all(&s, replacement.as_str()).into_owned();
    }

    s = s.replace('^', "**");
    let s = WHITESPACE.replace_all(&s, " ").trim().to_string();

    if s.is_empty() {
        tracing::debug!(input = original, "normalization left nothing, using input");
        return original.to_string();
    }

    if s != original {
        tracing::debug!(input = original, normalized = %s, "normalized phrase");
    }
    s
}
