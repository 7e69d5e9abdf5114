//! Fallback move synthesis

use crate::policy::HeuristicPolicy;
use mindgames_domain::rules::round_progress;
use mindgames_domain::{Claim, ClaimType, GamePhase, GameState, Move, PlayerId};

/// What to claim when the decision backend is unavailable
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimPlan {
    /// Claim category for the trust band
    pub claim_type: ClaimType,
    /// Boldness for the trust band
    pub boldness: f64,
    /// Fixed description for the trust band
    pub description: &'static str,
    /// Move confidence, `0.5 + (1 − boldness)·0.3`
    pub confidence: f64,
}

impl ClaimPlan {
    /// Turn the plan into a move for `player`
    pub fn into_move(self, player: PlayerId) -> Move {
        Move::claiming(
            player,
            Claim::new(self.description, self.claim_type, self.boldness),
            self.confidence,
        )
    }
}

/// Pick claim type and boldness from the trust differential
///
/// - far behind: a bold accusation, bolder as the game runs out
/// - far ahead: a low-risk informational claim
/// - otherwise: a moderate prediction
pub fn claim_plan(
    my_trust: i32,
    opp_trust: i32,
    round: u32,
    policy: &HeuristicPolicy,
) -> ClaimPlan {
    let (claim_type, boldness, description) = if my_trust < opp_trust - policy.trust_gap {
        (
            ClaimType::Accusation,
            policy.behind_boldness + round_progress(round) * policy.behind_round_boldness,
            "I have critical information that will shift the balance",
        )
    } else if my_trust > opp_trust + policy.trust_gap {
        (
            ClaimType::Information,
            policy.ahead_boldness,
            "My analysis confirms a favorable position",
        )
    } else {
        (
            ClaimType::Prediction,
            policy.even_boldness,
            "I predict developments that favor strategic positioning",
        )
    };

    ClaimPlan {
        claim_type,
        boldness,
        description,
        confidence: 0.5 + (1.0 - boldness) * 0.3,
    }
}

/// How suspicious the pending claim looks
///
/// `boldness·0.6`, plus a bump when the opponent is far behind (they have a
/// motive to bluff) and when self is far behind (a successful challenge is
/// the cheapest catch-up).
pub fn suspicion_score(
    boldness: f64,
    my_trust: i32,
    opp_trust: i32,
    policy: &HeuristicPolicy,
) -> f64 {
    let mut score = boldness * policy.suspicion_boldness_weight;
    if opp_trust < my_trust - policy.trust_gap {
        score += policy.opponent_behind_suspicion;
    }
    if my_trust < opp_trust - policy.trust_gap {
        score += policy.self_behind_suspicion;
    }
    score
}

/// Challenge-phase fallback verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChallengeDecision {
    /// Dispute the claim; confidence is the suspicion score
    Challenge {
        /// Move confidence
        confidence: f64,
    },
    /// Let the claim stand; confidence is `1 − suspicion`
    Accept {
        /// Move confidence
        confidence: f64,
    },
}

/// Challenge iff the suspicion score is strictly above the threshold
pub fn challenge_decision(
    boldness: f64,
    my_trust: i32,
    opp_trust: i32,
    policy: &HeuristicPolicy,
) -> ChallengeDecision {
    let suspicion = suspicion_score(boldness, my_trust, opp_trust, policy);
    if suspicion > policy.challenge_threshold {
        ChallengeDecision::Challenge {
            confidence: suspicion,
        }
    } else {
        ChallengeDecision::Accept {
            confidence: 1.0 - suspicion,
        }
    }
}

/// Deterministic move for `player` in the current phase
///
/// Claim phase uses [`claim_plan`], Challenge phase uses
/// [`challenge_decision`] (accepting if nothing is pending), and Resolution or
/// a finished game yields an acknowledgement.
pub fn fallback_move(state: &GameState, player: PlayerId, policy: &HeuristicPolicy) -> Move {
    let (my_trust, opp_trust) = state.trust_pair(player);

    if state.game_over {
        return Move::accepting(player, policy.default_confidence);
    }

    match state.phase {
        GamePhase::Claim => {
            claim_plan(my_trust, opp_trust, state.current_round, policy).into_move(player)
        }
        GamePhase::Challenge => match &state.current_claim {
            Some(claim) => match challenge_decision(claim.boldness(), my_trust, opp_trust, policy) {
                ChallengeDecision::Challenge { confidence } => {
                    Move::challenging(player, confidence)
                }
                ChallengeDecision::Accept { confidence } => Move::accepting(player, confidence),
            },
            None => Move::accepting(player, policy.default_confidence),
        },
        GamePhase::Resolution => Move::accepting(player, policy.default_confidence),
    }
}
