//! Command-line interface.
//!
//! Argument definitions, command implementations and shell completions.

pub mod args;
pub mod commands;
pub mod completions;

pub use args::{Cli, Commands, ConfigCommand, SummarizeArgs};
