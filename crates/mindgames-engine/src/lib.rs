//! Strategic Mind Games Engine
//!
//! The phase state machine that runs one game: move validation, round
//! resolution, the probabilistic claim-truth check, threshold detection and
//! observer notification.
//!
//! # Architecture
//!
//! - [`GameEngine`]: synchronous state machine; `process_move` is its only
//!   mutating entry point and validates fully before touching state
//! - [`GameSession`]: async wrapper that serialises moves through a mutex and
//!   runs each one on a spawned task
//! - [`RulesConfig`]: turn order and the [`TruthModel`] tuning
//!
//! # Examples
//!
//! ```
//! use mindgames_domain::{Claim, ClaimType, FixedDraw, GamePhase, Move, Player, PlayerType};
//! use mindgames_engine::{GameEngine, RulesConfig};
//!
//! let mut engine = GameEngine::with_random_source(RulesConfig::default(), FixedDraw(0.0));
//! let state = engine.start_new_game(
//!     Player::new("Alice", PlayerType::Human),
//!     Player::new("Bot", PlayerType::AiMedium),
//! );
//! let alice = state.player1.id();
//!
//! let claim = Claim::new("I know where the gold is", ClaimType::Information, 0.4);
//! engine.process_move(&Move::claiming(alice, claim, 0.8)).unwrap();
//! assert_eq!(engine.state().unwrap().phase, GamePhase::Challenge);
//!
//! let result = engine.process_move(&Move::accepting(alice, 0.5)).unwrap();
//! assert_eq!(result.trust_change, 5);
//! assert_eq!(engine.state().unwrap().player1.trust_score(), 55);
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod random;
mod session;

pub use config::{RulesConfig, TruthModel, TurnOrder};
pub use engine::{check_thresholds, GameEngine, MAX_ROUNDS_MESSAGE};
pub use error::EngineError;
pub use random::RngSource;
pub use session::GameSession;
