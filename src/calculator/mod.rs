//! Calculator core: operation library and sandboxed expression evaluator.
//!
//! This module provides functionality to:
//! - Run the fixed catalog of numeric operations with domain checks
//! - Rewrite informal English phrases into expressions
//! - Evaluate expressions against a closed namespace of functions and constants
//! - Format results and copy them to the clipboard

pub mod catalog;
mod clipboard;
mod detection;
mod error;
mod evaluation;
mod format;
mod lexer;
pub mod namespace;
pub mod operations;
mod parser;
mod phrase;

pub use catalog::{EVALUATE_CHOICE, EXIT_CHOICE, Operation};
pub use clipboard::copy_to_clipboard;
pub use detection::looks_like_expression;
pub use error::{CalcError, Result};
pub use evaluation::{CalcResult, evaluate, evaluate_phrase};
pub use format::NumberFormat;
pub use namespace::MEMORY_TOKEN;
pub use phrase::normalize;
