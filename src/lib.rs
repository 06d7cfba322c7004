//! A scientific calculator with a console menu, a keypad front-end and a
//! sandboxed expression evaluator.

pub mod calculator;
pub mod config;
pub mod session;
