//! Wire format for game state
//!
//! The JSON shape the decision backend consumes:
//!
//! ```json
//! {
//!   "round": 3,
//!   "phase": "CHALLENGE",
//!   "player1_trust": 55,
//!   "player2_trust": 40,
//!   "current_claim": {"description": "...", "type": "PREDICTION", "boldness": 0.45},
//!   "move_history": [{"round": 1, "player": "Alice", "action": "CLAIM", "trust_change": 0}]
//! }
//! ```

use crate::claim::{Claim, ClaimType};
use crate::error::DomainError;
use crate::state::{GamePhase, GameState};
use serde::{Deserialize, Serialize};

/// Serialized claim payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireClaim {
    /// Free-text description
    pub description: String,
    /// Claim type name (`INFORMATION`, `PREDICTION`, `ACCUSATION`, `ALLIANCE`)
    #[serde(rename = "type")]
    pub claim_type: String,
    /// Boldness in `[0, 1]`
    pub boldness: f64,
}

impl WireClaim {
    /// Decode into a domain claim (boldness is re-clamped)
    pub fn to_claim(&self) -> Claim {
        Claim::new(
            self.description.clone(),
            ClaimType::parse_lenient(&self.claim_type),
            self.boldness,
        )
    }
}

impl From<&Claim> for WireClaim {
    fn from(claim: &Claim) -> Self {
        Self {
            description: claim.description().to_string(),
            claim_type: claim.claim_type().as_str().to_string(),
            boldness: claim.boldness(),
        }
    }
}

/// Serialized history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireHistoricalMove {
    /// Round of the move
    pub round: u32,
    /// Acting player's display name
    pub player: String,
    /// Action name
    pub action: String,
    /// Net trust change
    pub trust_change: i32,
}

/// Serialized game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireGameState {
    /// Current round
    pub round: u32,
    /// Phase name (`CLAIM`, `CHALLENGE`, `RESOLUTION`)
    pub phase: String,
    /// Player1 trust
    pub player1_trust: i32,
    /// Player2 trust
    pub player2_trust: i32,
    /// Pending claim, `null` outside the Challenge/Resolution window
    pub current_claim: Option<WireClaim>,
    /// Full move history, oldest first
    #[serde(default)]
    pub move_history: Vec<WireHistoricalMove>,
}

impl WireGameState {
    /// Decode the phase name
    pub fn phase(&self) -> Result<GamePhase, DomainError> {
        GamePhase::parse(&self.phase)
    }
}

impl From<&GameState> for WireGameState {
    fn from(state: &GameState) -> Self {
        Self {
            round: state.current_round,
            phase: state.phase.as_str().to_string(),
            player1_trust: state.player1.trust_score(),
            player2_trust: state.player2.trust_score(),
            current_claim: state.current_claim.as_ref().map(WireClaim::from),
            move_history: state
                .move_history
                .iter()
                .map(|m| WireHistoricalMove {
                    round: m.round,
                    player: m.player_name.clone(),
                    action: m.action.clone(),
                    trust_change: m.trust_change,
                })
                .collect(),
        }
    }
}
