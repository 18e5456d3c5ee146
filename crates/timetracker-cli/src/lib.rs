//! Command-line front end: bootstrap, authorization prompt, calendar listing
//!
//! This crate provides the `gcal-time-tracker` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompt;

pub use cli::Cli;
pub use error::{ClientError, ClientResult, Severity};
pub use prompt::ConsolePrompt;
