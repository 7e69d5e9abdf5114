//! Game state module - rounds, phases, turns and history

use crate::claim::Claim;
use crate::error::DomainError;
use crate::player::{now_millis, Player, PlayerId};
use std::fmt;

/// Phase within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// The acting player makes a claim
    Claim,
    /// The pending claim is challenged or accepted
    Challenge,
    /// The round is settled and the next one begins
    Resolution,
}

impl GamePhase {
    /// Wire name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Claim => "CLAIM",
            GamePhase::Challenge => "CHALLENGE",
            GamePhase::Resolution => "RESOLUTION",
        }
    }

    /// Parse a phase name, case-insensitive
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_uppercase().as_str() {
            "CLAIM" => Ok(GamePhase::Claim),
            "CHALLENGE" => Ok(GamePhase::Challenge),
            "RESOLUTION" => Ok(GamePhase::Resolution),
            other => Err(DomainError::UnknownPhase(other.to_string())),
        }
    }

    /// The phase that follows this one in the strict cycle
    pub fn next(&self) -> Self {
        match self {
            GamePhase::Claim => GamePhase::Challenge,
            GamePhase::Challenge => GamePhase::Resolution,
            GamePhase::Resolution => GamePhase::Claim,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seat of a player in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    /// First seat; acts first in round 1
    Player1,
    /// Second seat
    Player2,
}

impl PlayerSlot {
    /// The other seat
    pub fn opponent(&self) -> Self {
        match self {
            PlayerSlot::Player1 => PlayerSlot::Player2,
            PlayerSlot::Player2 => PlayerSlot::Player1,
        }
    }

    /// Numeric id used by the native search module (1 or 2)
    pub fn number(&self) -> u8 {
        match self {
            PlayerSlot::Player1 => 1,
            PlayerSlot::Player2 => 2,
        }
    }
}

/// A resolved move, as recorded in the game history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalMove {
    /// Round in which the move was made
    pub round: u32,
    /// Display name of the acting player
    pub player_name: String,
    /// Action name (`CLAIM`, `CHALLENGE`, `ACCEPT`)
    pub action: String,
    /// Net trust change for the acting player
    pub trust_change: i32,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl HistoricalMove {
    /// Create a history entry stamped with the current time
    pub fn new(
        round: u32,
        player_name: impl Into<String>,
        action: impl Into<String>,
        trust_change: i32,
    ) -> Self {
        Self {
            round,
            player_name: player_name.into(),
            action: action.into(),
            trust_change,
            timestamp: now_millis(),
        }
    }
}

/// Full state of one game
///
/// Cloning produces an independent snapshot (the history is deep-copied), which
/// is how the engine hands state to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// First seat
    pub player1: Player,
    /// Second seat
    pub player2: Player,
    /// Current round, starting at 1
    pub current_round: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Claim awaiting challenge or resolution
    pub current_claim: Option<Claim>,
    /// Who made the pending claim
    pub claimant: Option<PlayerId>,
    /// Whose turn it is
    pub current_player: PlayerId,
    /// Terminal flag
    pub game_over: bool,
    /// Why the game ended
    pub victory_message: Option<String>,
    /// Append-only record of resolved moves
    pub move_history: Vec<HistoricalMove>,
}

impl GameState {
    /// Initial state: round 1, Claim phase, player1 to act
    pub fn new(player1: Player, player2: Player) -> Self {
        let current_player = player1.id();
        Self {
            player1,
            player2,
            current_round: 1,
            phase: GamePhase::Claim,
            current_claim: None,
            claimant: None,
            current_player,
            game_over: false,
            victory_message: None,
            move_history: Vec::new(),
        }
    }

    /// Seat of the player with this id
    pub fn slot_of(&self, id: PlayerId) -> Option<PlayerSlot> {
        if self.player1.id() == id {
            Some(PlayerSlot::Player1)
        } else if self.player2.id() == id {
            Some(PlayerSlot::Player2)
        } else {
            None
        }
    }

    /// Player sitting in a seat
    pub fn player_in(&self, slot: PlayerSlot) -> &Player {
        match slot {
            PlayerSlot::Player1 => &self.player1,
            PlayerSlot::Player2 => &self.player2,
        }
    }

    /// Mutable access to the player sitting in a seat
    pub fn player_in_mut(&mut self, slot: PlayerSlot) -> &mut Player {
        match slot {
            PlayerSlot::Player1 => &mut self.player1,
            PlayerSlot::Player2 => &mut self.player2,
        }
    }

    /// Player with this id
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.slot_of(id).map(|slot| self.player_in(slot))
    }

    /// The player whose turn it is
    pub fn current(&self) -> &Player {
        self.player(self.current_player).unwrap_or(&self.player1)
    }

    /// `(own trust, opponent trust)` from the perspective of `id`
    ///
    /// Unknown ids are treated as player2.
    pub fn trust_pair(&self, id: PlayerId) -> (i32, i32) {
        let slot = self.slot_of(id).unwrap_or(PlayerSlot::Player2);
        (
            self.player_in(slot).trust_score(),
            self.player_in(slot.opponent()).trust_score(),
        )
    }

    /// True when a claim is pending (Challenge and Resolution phases)
    pub fn has_pending_claim(&self) -> bool {
        self.current_claim.is_some()
    }
}
