//! Session state owned by a front-end: memory slot plus history.
//!
//! Each session is independent; nothing is shared between them.

mod console;
mod history;
mod keypad;

pub use console::{ConsoleSession, parse_number};
pub use history::{History, HistoryEntry};
pub use keypad::{Key, KeypadSession, LAYOUT};
