//! Tuning values for the fallback heuristics
//!
//! These are policy, not structure: the defaults reproduce the long-standing
//! behavior and should only change with product guidance.

use serde::{Deserialize, Serialize};

/// Thresholds and weights for fallback move synthesis
///
/// # Examples
///
/// ```
/// use mindgames_heuristics::HeuristicPolicy;
///
/// let policy = HeuristicPolicy::default();
/// assert_eq!(policy.challenge_threshold, 0.55);
/// assert_eq!(policy.trust_gap, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicPolicy {
    /// Trust difference that separates "far behind"/"far ahead" from "even"
    pub trust_gap: i32,

    /// Base boldness when far behind (an accusation)
    pub behind_boldness: f64,

    /// Extra boldness when far behind, scaled by round progress
    pub behind_round_boldness: f64,

    /// Boldness when far ahead (informational)
    pub ahead_boldness: f64,

    /// Boldness when roughly even (a prediction)
    pub even_boldness: f64,

    /// Weight of the pending claim's boldness in the suspicion score
    pub suspicion_boldness_weight: f64,

    /// Suspicion added when the opponent is far behind
    pub opponent_behind_suspicion: f64,

    /// Suspicion added when self is far behind
    pub self_behind_suspicion: f64,

    /// Challenge iff suspicion is strictly above this
    pub challenge_threshold: f64,

    /// Confidence attached to fallback moves with no better estimate
    pub default_confidence: f64,

    /// Position evaluation weights
    pub evaluation: EvaluationWeights,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self {
            trust_gap: 20,
            behind_boldness: 0.6,
            behind_round_boldness: 0.2,
            ahead_boldness: 0.3,
            even_boldness: 0.45,
            suspicion_boldness_weight: 0.6,
            opponent_behind_suspicion: 0.2,
            self_behind_suspicion: 0.15,
            challenge_threshold: 0.55,
            default_confidence: 0.6,
            evaluation: EvaluationWeights::default(),
        }
    }
}

/// Weights of the heuristic position evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationWeights {
    /// Trust difference is divided by this
    pub trust_divisor: f64,

    /// Round progress beyond which the urgency factor applies
    pub late_game_progress: f64,

    /// Multiplier on the trust term late in the game
    pub urgency_factor: f64,

    /// Trust at or above which a player is about to win
    pub near_victory_trust: i32,

    /// Trust at or below which a player is about to lose
    pub near_defeat_trust: i32,

    /// Bonus when self is about to win
    pub own_near_victory_bonus: f64,

    /// Bonus when the opponent is about to lose
    pub opponent_near_defeat_bonus: f64,

    /// Penalty when self is about to lose
    pub own_near_defeat_penalty: f64,

    /// Penalty when the opponent is about to win
    pub opponent_near_victory_penalty: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            trust_divisor: 3.0,
            late_game_progress: 0.75,
            urgency_factor: 1.5,
            near_victory_trust: 90,
            near_defeat_trust: -40,
            own_near_victory_bonus: 20.0,
            opponent_near_defeat_bonus: 15.0,
            own_near_defeat_penalty: 15.0,
            opponent_near_victory_penalty: 20.0,
        }
    }
}
