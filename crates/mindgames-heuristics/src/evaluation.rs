//! Heuristic position evaluation

use crate::policy::HeuristicPolicy;
use mindgames_domain::rules::round_progress;
use mindgames_domain::{GameState, PlayerId};

/// Score a position from the perspective of `player`
///
/// Positive favors `player`. Unknown ids are scored as player2.
pub fn evaluate_position(state: &GameState, player: PlayerId, policy: &HeuristicPolicy) -> f64 {
    let (my_trust, opp_trust) = state.trust_pair(player);
    evaluate_trust(my_trust, opp_trust, state.current_round, policy)
}

/// Score raw trust values at a given round
///
/// `(my − opp) / 3`, scaled by 1.5 once three quarters of the rounds are
/// gone, then shifted by flat bonuses and penalties when either side is near
/// a threshold.
///
/// ```
/// use mindgames_heuristics::{evaluate_trust, HeuristicPolicy};
///
/// let policy = HeuristicPolicy::default();
/// assert_eq!(evaluate_trust(50, 50, 1, &policy), 0.0);
/// assert_eq!(evaluate_trust(80, 50, 16, &policy), 15.0);
/// ```
pub fn evaluate_trust(my_trust: i32, opp_trust: i32, round: u32, policy: &HeuristicPolicy) -> f64 {
    let weights = &policy.evaluation;

    let urgency = if round_progress(round) > weights.late_game_progress {
        weights.urgency_factor
    } else {
        1.0
    };
    let mut score = f64::from(my_trust - opp_trust) / weights.trust_divisor * urgency;

    if my_trust >= weights.near_victory_trust {
        score += weights.own_near_victory_bonus;
    }
    if opp_trust <= weights.near_defeat_trust {
        score += weights.opponent_near_defeat_bonus;
    }
    if my_trust <= weights.near_defeat_trust {
        score -= weights.own_near_defeat_penalty;
    }
    if opp_trust >= weights.near_victory_trust {
        score -= weights.opponent_near_victory_penalty;
    }

    score
}

/// Node count reported by a search that ran without the native module
///
/// `4^depth`, saturating.
pub fn synthetic_node_count(depth: u8) -> u64 {
    4u64.saturating_pow(u32::from(depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgames_domain::{Player, PlayerType};
    use proptest::prelude::*;

    #[test]
    fn test_even_position_is_zero() {
        let policy = HeuristicPolicy::default();
        assert_eq!(evaluate_trust(50, 50, 5, &policy), 0.0);
    }

    #[test]
    fn test_urgency_applies_late() {
        let policy = HeuristicPolicy::default();
        // round 15 is exactly 0.75 → no urgency
        assert_eq!(evaluate_trust(80, 50, 15, &policy), 10.0);
        assert_eq!(evaluate_trust(80, 50, 16, &policy), 15.0);
    }

    #[test]
    fn test_threshold_bonuses() {
        let policy = HeuristicPolicy::default();
        // 140/3 + 20 + 15
        let score = evaluate_trust(95, -45, 5, &policy);
        assert!((score - (140.0 / 3.0 + 35.0)).abs() < 1e-9);

        // mirrored: −140/3 − 15 − 20
        let score = evaluate_trust(-45, 95, 5, &policy);
        assert!((score + (140.0 / 3.0 + 35.0)).abs() < 1e-9);

        // both near victory cancel out
        assert_eq!(evaluate_trust(90, 90, 1, &policy), 0.0);
    }

    #[test]
    fn test_position_perspective() {
        let policy = HeuristicPolicy::default();
        let state = GameState::new(
            Player::with_trust_score("Alice", PlayerType::Human, 80),
            Player::with_trust_score("Bot", PlayerType::AiHard, 50),
        );
        assert_eq!(evaluate_position(&state, state.player1.id(), &policy), 10.0);
        assert_eq!(evaluate_position(&state, state.player2.id(), &policy), -10.0);
    }

    #[test]
    fn test_synthetic_node_count() {
        assert_eq!(synthetic_node_count(0), 1);
        assert_eq!(synthetic_node_count(4), 256);
        assert_eq!(synthetic_node_count(6), 4096);
        assert_eq!(synthetic_node_count(255), u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_evaluation_is_antisymmetric_away_from_thresholds(
            a in -39i32..90,
            b in -39i32..90,
            round in 1u32..=20,
        ) {
            let policy = HeuristicPolicy::default();
            let forward = evaluate_trust(a, b, round, &policy);
            let backward = evaluate_trust(b, a, round, &policy);
            prop_assert!((forward + backward).abs() < 1e-9);
        }
    }
}
