//! Strategic Mind Games CLI library.
//!
//! This library provides the terminal front end: configuration loading, bridge
//! startup and status reporting, output formatting and the game loop.

pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod output;
pub mod status;

pub use cli::{Cli, Command, Difficulty, PlayArgs};
pub use config::{AppConfig, Settings};
pub use error::{CliError, ConfigError, Result};
pub use game::{open_editor, parse_input, GameRunner, Input};
pub use output::Formatter;
pub use status::{start_orchestrator, start_search, InitSummary};
