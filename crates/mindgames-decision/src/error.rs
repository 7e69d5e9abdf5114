//! Error types for the decision orchestrator

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to callers of the orchestrator
///
/// Decision requests never return these once the orchestrator is initialized;
/// they come from lifecycle calls and `set_difficulty`.
#[derive(Error, Debug)]
pub enum DecisionError {
    /// A call that requires `initialize()` was made before it
    #[error("Decision orchestrator not initialized; call initialize() first")]
    NotInitialized,

    /// No working executable or no working directory for the backend
    #[error("Decision backend not found: {0}")]
    BackendNotFound(String),

    /// Spawning the backend process failed
    #[error("Failed to spawn decision backend: {0}")]
    Spawn(#[source] std::io::Error),

    /// The backend process exited before becoming healthy
    #[error("Decision backend exited during startup (status: {0})")]
    ProcessExited(String),

    /// The backend did not become healthy in time
    #[error("Decision backend failed to start within {0:?}")]
    StartupTimeout(Duration),

    /// A request to the backend failed
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A single failed exchange with the backend
///
/// Inside the decision path these are counted as failed attempts and logged.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, timeout or body errors
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The backend answered with an `{error}` body
    #[error("Backend error: {0}")]
    Backend(String),

    /// The response could not be turned into a valid move
    #[error("Malformed response: {0}")]
    Malformed(String),
}
