//! Trait definitions for external interactions
//!
//! These traits define the seams between the game rules and the things the
//! rules must not own: randomness and event delivery.

use crate::result::GameEvent;
use crate::state::GameState;

/// Source of uniform draws in `[0, 1)` for claim-truth resolution
///
/// Implemented by the engine crate over `rand`; tests inject [`FixedDraw`] to
/// pin the outcome of a challenge.
pub trait RandomSource: Send {
    /// Next uniform draw in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

/// Always returns the same draw
///
/// A draw of `0.0` makes every claim true; a draw of `0.999` makes every claim
/// with truth probability ≤ 0.9 a bluff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Receives game lifecycle notifications
///
/// Called synchronously on the engine's task after the state has been updated;
/// implementations should return quickly.
pub trait GameObserver: Send + Sync {
    /// Handle one event with a view of the state that produced it
    fn on_game_event(&self, event: GameEvent, state: &GameState);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_draw() {
        let mut draw = FixedDraw(0.25);
        assert_eq!(draw.next_unit(), 0.25);
        assert_eq!(draw.next_unit(), 0.25);
    }
}
