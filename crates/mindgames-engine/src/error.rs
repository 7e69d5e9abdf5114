//! Engine error types

use mindgames_domain::{GamePhase, MoveKind};
use thiserror::Error;

/// Rejected moves and session failures
///
/// Every variant is a caller error: the move was not applied and state is
/// unchanged. Retrying the same move will fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No move was supplied
    #[error("Move cannot be null")]
    NullMove,

    /// No game has been started
    #[error("No active game")]
    NoActiveGame,

    /// The game has already ended
    #[error("Game is over")]
    GameOver,

    /// The move came from a player other than the current one
    #[error("Not this player's turn (expected {expected})")]
    NotYourTurn {
        /// Name of the player whose turn it is
        expected: String,
    },

    /// The move kind does not fit the phase
    #[error("{kind} is not allowed in the {phase} phase")]
    WrongMoveForPhase {
        /// Current phase
        phase: GamePhase,
        /// Rejected move kind
        kind: MoveKind,
    },

    /// The session no longer accepts moves
    #[error("Game session is shut down")]
    SessionClosed,
}
