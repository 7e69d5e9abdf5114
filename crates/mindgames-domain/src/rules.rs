//! Rule constants of the trust economy
//!
//! These are structural: changing them changes the game, not its tuning.
//! Tuning values (truth probability, fallback bands) live in the config
//! structs of the crates that use them.

/// Last playable round; advancing past it ends the game
pub const MAX_ROUNDS: u32 = 20;

/// Trust at or above this value wins the game
pub const VICTORY_THRESHOLD: i32 = 100;

/// Trust at or below this value loses the game
pub const DEFEAT_THRESHOLD: i32 = -50;

/// Trust every player starts with
pub const STARTING_TRUST: i32 = 50;

/// Claimant reward when the claim is accepted
pub const ACCEPT_CLAIMANT_DELTA: i32 = 5;

/// Claimant reward when a challenge against a true claim fails
pub const FAILED_CHALLENGE_CLAIMANT_DELTA: i32 = 10;

/// Challenger reward when the challenged claim was a bluff
pub const SUCCESSFUL_CHALLENGE_DELTA: i32 = 15;

/// Challenger penalty when the challenged claim was true
pub const FAILED_CHALLENGE_DELTA: i32 = -15;

/// Claimant penalty when a bluff is caught
pub const CAUGHT_BLUFF_DELTA: i32 = -20;

/// Every trust delta the engine is allowed to apply
pub const TRUST_DELTAS: [i32; 5] = [
    ACCEPT_CLAIMANT_DELTA,
    FAILED_CHALLENGE_CLAIMANT_DELTA,
    SUCCESSFUL_CHALLENGE_DELTA,
    FAILED_CHALLENGE_DELTA,
    CAUGHT_BLUFF_DELTA,
];

/// Fraction of the game that has elapsed at `round` (1.0 at the last round)
pub fn round_progress(round: u32) -> f64 {
    f64::from(round) / f64::from(MAX_ROUNDS)
}
