//! JSON exchanged with the native module
//!
//! The module uses its own enum spellings (`"Claim"`, `"Information"`) and
//! expects an `is_bluff` flag on claims, so it gets a dedicated shape rather
//! than the decision backend's wire format.

use mindgames_domain::{Claim, ClaimType, GamePhase, GameState};
use serde::{Deserialize, Serialize};

/// Game state as the native module reads it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeGameState {
    /// Current round
    pub round: u32,
    /// `Claim`, `Challenge` or `Resolution`
    pub phase: &'static str,
    /// Player1 trust
    pub player1_trust: i32,
    /// Player2 trust
    pub player2_trust: i32,
    /// Pending claim
    pub current_claim: Option<NativeClaim>,
    /// Always empty: the module's history schema differs from ours and
    /// evaluation does not read it
    pub move_history: Vec<serde_json::Value>,
}

/// Claim as the native module reads it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeClaim {
    /// Free-text description
    pub description: String,
    /// `Information`, `Prediction`, `Accusation` or `Alliance`
    pub claim_type: &'static str,
    /// Boldness in `[0, 1]`
    pub boldness: f64,
    /// Truth is unknown to the evaluator
    pub is_bluff: bool,
}

impl From<&Claim> for NativeClaim {
    fn from(claim: &Claim) -> Self {
        Self {
            description: claim.description().to_string(),
            claim_type: native_claim_type(claim.claim_type()),
            boldness: claim.boldness(),
            is_bluff: false,
        }
    }
}

impl From<&GameState> for NativeGameState {
    fn from(state: &GameState) -> Self {
        Self {
            round: state.current_round,
            phase: native_phase(state.phase),
            player1_trust: state.player1.trust_score(),
            player2_trust: state.player2.trust_score(),
            current_claim: state.current_claim.as_ref().map(NativeClaim::from),
            move_history: Vec::new(),
        }
    }
}

impl NativeGameState {
    /// Fresh round-1 state used by the load-time self-test
    pub fn neutral() -> Self {
        Self {
            round: 1,
            phase: native_phase(GamePhase::Claim),
            player1_trust: 50,
            player2_trust: 50,
            current_claim: None,
            move_history: Vec::new(),
        }
    }
}

fn native_phase(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Claim => "Claim",
        GamePhase::Challenge => "Challenge",
        GamePhase::Resolution => "Resolution",
    }
}

fn native_claim_type(claim_type: ClaimType) -> &'static str {
    match claim_type {
        ClaimType::Information => "Information",
        ClaimType::Prediction => "Prediction",
        ClaimType::Accusation => "Accusation",
        ClaimType::Alliance => "Alliance",
    }
}

/// Search result as the native module reports it
#[derive(Debug, Clone, Deserialize)]
pub struct NativeSearchResult {
    /// Suggested move
    pub best_move: Option<NativeMove>,
    /// Position evaluation
    pub evaluation: f64,
    /// Nodes visited
    pub nodes_explored: u64,
    /// Depth reached
    pub depth_reached: u8,
    /// Time spent inside the module
    pub time_ms: u64,
}

/// Move suggestion as the native module reports it
#[derive(Debug, Clone, Deserialize)]
pub struct NativeMove {
    /// Action name
    pub action: String,
    /// Confidence in the move
    pub confidence: f64,
}
