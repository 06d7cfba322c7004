//! Append-only record of completed calculations.

use crate::calculator::CalcResult;
use serde::Serialize;

/// One completed calculation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// What was computed, e.g. `gcd(12, 18)` or the typed expression.
    pub description: String,
    /// The result as it was displayed.
    pub result: String,
}

impl HistoryEntry {
    pub fn new(description: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            result: result.into(),
        }
    }

    /// Create an entry from a successful evaluation. Errors are not recorded.
    pub fn from_calc_result(result: &CalcResult) -> Option<Self> {
        match result {
            CalcResult::Success {
                input,
                display_result,
                ..
            } => Some(Self::new(input.clone(), display_result.clone())),
            CalcResult::Error { .. } => None,
        }
    }

    /// The line shown to the user: `description = result`.
    pub fn line(&self) -> String {
        format!("{} = {}", self.description, self.result)
    }
}

/// Ordered log of entries, oldest first. Owned by a single session.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The last `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    /// All entries, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Entry at `index` counted from the newest (0 is the latest).
    pub fn nth_newest(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.iter().rev().nth(index)
    }
}
