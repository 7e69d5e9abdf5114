//! Strategic Mind Games Domain Layer
//!
//! Core value types and rules of the trust economy game. Every other crate in
//! the workspace depends on this one; it carries no runtime, I/O or logging.
//!
//! ## Key Concepts
//!
//! - **Player**: a participant with a mutable trust score and bluff/challenge counters
//! - **Claim**: a categorized, boldness-weighted assertion made in the Claim phase
//! - **Move**: one action submitted to the engine (claim, challenge or accept)
//! - **GameState**: the full round/phase/turn state of one game
//! - **Wire format**: the JSON shape exchanged with decision backends
//!
//! ## Phases
//!
//! Each round cycles strictly `Claim → Challenge → Resolution`, after which the
//! next round starts in `Claim` again. The game ends when a player's trust
//! reaches [`rules::VICTORY_THRESHOLD`] or [`rules::DEFEAT_THRESHOLD`], or when
//! [`rules::MAX_ROUNDS`] is exhausted.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod error;
pub mod moves;
pub mod player;
pub mod result;
pub mod rules;
pub mod state;
pub mod traits;
pub mod wire;

// Re-exports for convenience
pub use claim::{Claim, ClaimType};
pub use error::DomainError;
pub use moves::{Move, MoveKind};
pub use player::{Player, PlayerId, PlayerType, TrustRecord};
pub use result::{GameEvent, RoundResult};
pub use state::{GamePhase, GameState, HistoricalMove, PlayerSlot};
pub use traits::{FixedDraw, GameObserver, RandomSource};
pub use wire::{WireClaim, WireGameState, WireHistoricalMove};
