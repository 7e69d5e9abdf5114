//! Strategic Mind Games Decision Orchestrator
//!
//! Obtains moves for AI players from a separately running decision service
//! over HTTP. The orchestrator can launch and supervise that service, keeps a
//! background health monitor running, retries transient failures, and falls
//! back to the deterministic heuristics in `mindgames-heuristics` whenever the
//! service cannot answer. Once initialized, asking for a move never fails.
//!
//! # Architecture
//!
//! - [`DecisionTransport`]: the network seam (`health`, `decide`, `set_difficulty`)
//! - [`HttpTransport`]: reqwest implementation
//! - [`MockTransport`]: scripted in-memory implementation for tests
//! - [`DecisionOrchestrator`]: lifecycle, health flag, retries and fallback
//!
//! # Examples
//!
//! ```
//! use mindgames_decision::{DecisionConfig, DecisionOrchestrator, MockTransport};
//! use mindgames_domain::{GameState, MoveKind, Player, PlayerType};
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! // Nothing answers at the backend address, so the heuristics decide
//! let mut orchestrator = DecisionOrchestrator::with_transport(
//!     DecisionConfig::attach("http://localhost:5000"),
//!     Default::default(),
//!     MockTransport::unhealthy(),
//! );
//! orchestrator.initialize().await.unwrap();
//!
//! let state = GameState::new(
//!     Player::new("Alice", PlayerType::Human),
//!     Player::new("Bot", PlayerType::AiMedium),
//! );
//! let decision = orchestrator.request_move_detailed(&state, state.player2.id()).await.unwrap();
//! assert!(decision.source.is_fallback());
//! assert_eq!(decision.mv.kind(), MoveKind::Claim);
//!
//! orchestrator.shutdown().await;
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
mod health;
pub mod orchestrator;
pub mod protocol;
mod supervisor;
pub mod transport;

pub use config::{DecisionConfig, LaunchConfig};
pub use error::{DecisionError, TransportError};
pub use orchestrator::{BackendStatus, Decision, DecisionOrchestrator, DecisionSource};
pub use transport::{DecisionTransport, HttpTransport, MockTransport};
