//! Strategic Mind Games Native Search Bridge
//!
//! Position evaluation and best-move search backed by a dynamically loaded
//! native module, with a pure heuristic fallback when the module is missing or
//! broken.
//!
//! # Architecture
//!
//! - [`SearchBackend`]: the capability seam
//! - [`NativeSearch`]: libloading-backed implementation over the module's C ABI
//! - [`HeuristicSearch`]: pure implementation over `mindgames-heuristics`
//! - [`SearchBridge`]: picks a backend once at startup and degrades per call
//!
//! A missing module is a supported mode of operation, not an error.
//!
//! # Examples
//!
//! ```
//! use mindgames_domain::{GameState, Player, PlayerType};
//! use mindgames_search::{SearchBridge, SearchConfig};
//!
//! let config = SearchConfig {
//!     library_name: "no_such_optimizer".to_string(),
//!     ..SearchConfig::default()
//! };
//! let bridge = SearchBridge::discover(&config, Default::default());
//! assert!(!bridge.is_native());
//!
//! let state = GameState::new(
//!     Player::new("Alice", PlayerType::Human),
//!     Player::new("Bot", PlayerType::AiHard),
//! );
//! assert_eq!(bridge.evaluate_position(&state, state.player1.id()), 0.0);
//! ```

#![warn(missing_docs)]

pub mod bridge;
pub mod config;
pub mod heuristic;
pub mod native;
pub mod protocol;

use mindgames_domain::{GameState, PlayerId};
use thiserror::Error;

pub use bridge::SearchBridge;
pub use config::SearchConfig;
pub use heuristic::HeuristicSearch;
pub use native::NativeSearch;

/// Evaluations are clamped to `±EVALUATION_LIMIT`
pub const EVALUATION_LIMIT: f64 = 1000.0;

/// Errors raised by a search backend
#[derive(Error, Debug)]
pub enum SearchError {
    /// No library file in any candidate directory
    #[error("Native library not found: {0}")]
    LibraryNotFound(String),

    /// The library or one of its symbols failed to load
    #[error("Failed to load native library: {0}")]
    Load(#[from] libloading::Error),

    /// The library loaded but failed its startup check
    #[error("Native self-test failed: {0}")]
    SelfTest(String),

    /// The game state could not be encoded for the native call
    #[error("Failed to encode state: {0}")]
    Encode(String),

    /// The native call returned a null result
    #[error("Native call returned null")]
    NullResult,

    /// The native call returned something unusable
    #[error("Invalid native result: {0}")]
    InvalidResult(String),
}

/// Suggested move from a search
#[derive(Debug, Clone, PartialEq)]
pub struct MoveHint {
    /// Action name as reported by the search
    pub action: String,
    /// Search confidence in the move
    pub confidence: f64,
}

/// Outcome of a best-move search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Position evaluation from the searcher's perspective
    pub evaluation: f64,
    /// Nodes visited
    pub nodes_explored: u64,
    /// Depth actually reached
    pub depth_reached: u8,
    /// Wall-clock time spent
    pub elapsed_ms: u64,
    /// Best move found, if any
    pub best_move: Option<MoveHint>,
}

/// A position evaluator and move searcher
///
/// Implementations must be usable from several threads at once.
pub trait SearchBackend: Send + Sync {
    /// Short backend name for logs and status output
    fn name(&self) -> &str;

    /// Evaluate `state` from the perspective of `player`
    fn evaluate(&self, state: &GameState, player: PlayerId) -> Result<f64, SearchError>;

    /// Search for the best move for `player` down to `depth`
    fn search(&self, state: &GameState, player: PlayerId, depth: u8)
        -> Result<SearchResult, SearchError>;
}

/// Clamp an evaluation into the supported range
pub(crate) fn clamp_evaluation(value: f64) -> f64 {
    value.clamp(-EVALUATION_LIMIT, EVALUATION_LIMIT)
}
