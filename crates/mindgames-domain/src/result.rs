//! Outputs of the game engine

/// Outcome of one processed move
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundResult {
    /// Whether the move was applied
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Net trust delta reported for the move
    pub trust_change: i32,
    /// Set when the move closed a round
    pub round_complete: bool,
    /// Player1 trust at emission time
    pub player1_score: i32,
    /// Player2 trust at emission time
    pub player2_score: i32,
}

/// Notifications delivered to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// A new game was started
    GameStarted,
    /// A move was applied
    MoveProcessed,
    /// A round was resolved
    RoundComplete,
    /// The game reached a terminal state
    GameEnded,
}

impl GameEvent {
    /// Event name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::GameStarted => "game_started",
            GameEvent::MoveProcessed => "move_processed",
            GameEvent::RoundComplete => "round_complete",
            GameEvent::GameEnded => "game_ended",
        }
    }
}
