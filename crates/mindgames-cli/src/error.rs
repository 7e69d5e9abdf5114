//! Error types for the CLI application.

use mindgames_decision::DecisionError;
use mindgames_engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`crate::AppConfig`]
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// No home directory to look for the default file in
    #[error("Could not find home directory")]
    NoHomeDir,
}

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A move was rejected by the engine
    #[error("Move rejected: {0}")]
    Engine(#[from] EngineError),

    /// Decision orchestrator error
    #[error("AI error: {0}")]
    Decision(#[from] DecisionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor failure
    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
