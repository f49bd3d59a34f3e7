//! Command-line driver for the tupl interning engine.

pub mod args;
pub mod driver;
pub mod literal;
