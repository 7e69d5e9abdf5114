//! Strategic Mind Games Fallback Heuristics
//!
//! Deterministic local decision-making shared by both backend bridges. When
//! the decision service is down or the native search module is missing, the
//! game stays playable on top of these functions; the AI just plays weaker.
//!
//! Every function here is pure: identical inputs always produce identical
//! outputs, with no hidden randomness and no I/O.
//!
//! # Example
//!
//! ```
//! use mindgames_domain::{GameState, MoveKind, Player, PlayerType};
//! use mindgames_heuristics::{fallback_move, HeuristicPolicy};
//!
//! let state = GameState::new(
//!     Player::new("Alice", PlayerType::Human),
//!     Player::new("Bot", PlayerType::AiMedium),
//! );
//! let bot = state.player2.id();
//! let mv = fallback_move(&state, bot, &HeuristicPolicy::default());
//! assert_eq!(mv.kind(), MoveKind::Claim);
//! ```

#![warn(missing_docs)]

mod decision;
mod evaluation;
mod policy;

pub use decision::{
    challenge_decision, claim_plan, fallback_move, suspicion_score, ChallengeDecision, ClaimPlan,
};
pub use evaluation::{evaluate_position, evaluate_trust, synthetic_node_count};
pub use policy::{EvaluationWeights, HeuristicPolicy};
