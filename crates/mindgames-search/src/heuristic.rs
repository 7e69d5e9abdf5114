//! Pure search fallback

use crate::{clamp_evaluation, SearchBackend, SearchError, SearchResult};
use mindgames_domain::{GameState, PlayerId};
use mindgames_heuristics::{evaluate_position, synthetic_node_count, HeuristicPolicy};
use std::time::Instant;

/// Search that never leaves the process
///
/// Evaluation is the heuristic score; "search" reports that score with a
/// synthetic `4^depth` node count and no move.
#[derive(Debug, Clone, Default)]
pub struct HeuristicSearch {
    policy: HeuristicPolicy,
}

impl HeuristicSearch {
    /// Heuristic search with the given tuning
    pub fn new(policy: HeuristicPolicy) -> Self {
        Self { policy }
    }

    /// Evaluate without the `Result` wrapper; this backend cannot fail
    pub fn score(&self, state: &GameState, player: PlayerId) -> f64 {
        clamp_evaluation(evaluate_position(state, player, &self.policy))
    }

    /// Search without the `Result` wrapper
    pub fn run(&self, state: &GameState, player: PlayerId, depth: u8) -> SearchResult {
        let started = Instant::now();
        let evaluation = self.score(state, player);
        SearchResult {
            evaluation,
            nodes_explored: synthetic_node_count(depth),
            depth_reached: depth,
            elapsed_ms: started.elapsed().as_millis() as u64,
            best_move: None,
        }
    }
}

impl SearchBackend for HeuristicSearch {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn evaluate(&self, state: &GameState, player: PlayerId) -> Result<f64, SearchError> {
        Ok(self.score(state, player))
    }

    fn search(
        &self,
        state: &GameState,
        player: PlayerId,
        depth: u8,
    ) -> Result<SearchResult, SearchError> {
        Ok(self.run(state, player, depth))
    }
}
