//! Async wrapper around [`GameEngine`]

use crate::engine::GameEngine;
use crate::error::EngineError;
use mindgames_domain::{GameObserver, GameState, Move, Player, RoundResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Shared game session
///
/// Moves are applied one at a time under the engine mutex, each on its own
/// spawned task. Callers await one result before submitting the next.
pub struct GameSession {
    engine: Arc<Mutex<GameEngine>>,
    closed: AtomicBool,
    tasks: Mutex<JoinSet<()>>,
}

impl GameSession {
    /// Wrap an engine
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            closed: AtomicBool::new(false),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Start a game and return its initial state
    pub async fn start_new_game(&self, player1: Player, player2: Player) -> GameState {
        self.engine
            .lock()
            .await
            .start_new_game(player1, player2)
            .clone()
    }

    /// Register an observer on the wrapped engine
    pub async fn add_observer(&self, observer: Arc<dyn GameObserver>) {
        self.engine.lock().await.add_observer(observer);
    }

    /// Owned copy of the current state
    pub async fn snapshot(&self) -> Option<GameState> {
        self.engine.lock().await.snapshot()
    }

    /// True once the running game has ended
    pub async fn is_game_over(&self) -> bool {
        self.engine.lock().await.is_game_over()
    }

    /// True after [`shutdown`](Self::shutdown)
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Apply a move on a spawned task
    ///
    /// # Errors
    ///
    /// [`EngineError::NullMove`] for `None`, [`EngineError::SessionClosed`]
    /// after shutdown, otherwise whatever the engine rejects the move with.
    pub async fn process_move(&self, mv: Option<Move>) -> Result<RoundResult, EngineError> {
        let mv = mv.ok_or(EngineError::NullMove)?;
        if self.is_closed() {
            return Err(EngineError::SessionClosed);
        }

        let (tx, rx) = oneshot::channel();
        let engine = Arc::clone(&self.engine);
        {
            let mut tasks = self.tasks.lock().await;
            // shutdown may have drained the set while this call waited for the lock
            if self.is_closed() {
                return Err(EngineError::SessionClosed);
            }
            while tasks.try_join_next().is_some() {}
            tasks.spawn(async move {
                let result = engine.lock().await.process_move(&mv);
                let _ = tx.send(result);
            });
        }

        // A dropped sender means the task was aborted by shutdown
        rx.await.unwrap_or(Err(EngineError::SessionClosed))
    }

    /// Stop accepting moves and wait for in-flight ones
    ///
    /// Tasks still running after `grace` are aborted.
    pub async fn shutdown(&self, grace: Duration) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Shutting down game session");

        let mut tasks = self.tasks.lock().await;
        let pending = tasks.len();
        let drained = tokio::time::timeout(grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                pending,
                grace_ms = grace.as_millis() as u64,
                "Move tasks did not finish in time, aborting"
            );
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
        } else {
            debug!(pending, "Move tasks drained");
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use mindgames_domain::{Claim, ClaimType, FixedDraw, GamePhase, PlayerType};

    fn session() -> GameSession {
        GameSession::new(GameEngine::with_random_source(
            RulesConfig::default(),
            FixedDraw(0.0),
        ))
    }

    #[tokio::test]
    async fn test_null_move() {
        let session = session();
        assert_eq!(
            session.process_move(None).await,
            Err(EngineError::NullMove)
        );
    }

    #[tokio::test]
    async fn test_moves_through_session() {
        let session = session();
        let state = session
            .start_new_game(
                Player::new("Alice", PlayerType::Human),
                Player::new("Bot", PlayerType::AiEasy),
            )
            .await;
        let alice = state.player1.id();

        let claim = Claim::new("The vault is empty", ClaimType::Information, 0.3);
        let result = session
            .process_move(Some(Move::claiming(alice, claim, 0.7)))
            .await
            .unwrap();
        assert!(result.success);

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, GamePhase::Challenge);
        // the snapshot is detached from the engine
        session
            .process_move(Some(Move::accepting(alice, 0.5)))
            .await
            .unwrap();
        assert_eq!(snapshot.phase, GamePhase::Challenge);
        assert_eq!(
            session.snapshot().await.unwrap().phase,
            GamePhase::Resolution
        );
    }

    #[tokio::test]
    async fn test_move_waiting_on_shutdown_is_refused() {
        let session = Arc::new(session());
        let state = session
            .start_new_game(
                Player::new("Alice", PlayerType::Human),
                Player::new("Bot", PlayerType::AiEasy),
            )
            .await;
        let alice = state.player1.id();

        // hold the task set the way a draining shutdown does
        let guard = session.tasks.lock().await;
        let pending = {
            let session = Arc::clone(&session);
            let claim = Claim::new("The vault is empty", ClaimType::Information, 0.3);
            tokio::spawn(async move {
                session
                    .process_move(Some(Move::claiming(alice, claim, 0.7)))
                    .await
            })
        };
        tokio::task::yield_now().await;
        session.closed.store(true, Ordering::SeqCst);
        drop(guard);

        assert_eq!(pending.await.unwrap(), Err(EngineError::SessionClosed));
        assert!(session.tasks.lock().await.is_empty());
        assert_eq!(session.snapshot().await.unwrap().phase, GamePhase::Claim);
    }

    #[tokio::test]
    async fn test_engine_errors_pass_through() {
        let session = session();
        let mv = Move::accepting(mindgames_domain::PlayerId::new(), 0.5);
        assert_eq!(
            session.process_move(Some(mv)).await,
            Err(EngineError::NoActiveGame)
        );
    }

    #[tokio::test]
    async fn test_closed_after_shutdown() {
        let session = session();
        let state = session
            .start_new_game(
                Player::new("Alice", PlayerType::Human),
                Player::new("Bot", PlayerType::AiEasy),
            )
            .await;

        session.shutdown(Duration::from_millis(100)).await;
        assert!(session.is_closed());

        let mv = Move::accepting(state.player1.id(), 0.5);
        assert_eq!(
            session.process_move(Some(mv)).await,
            Err(EngineError::SessionClosed)
        );
        // second shutdown is a no-op
        session.shutdown(Duration::from_millis(100)).await;
    }
}
