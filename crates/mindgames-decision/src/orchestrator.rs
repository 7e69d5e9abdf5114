//! Decision orchestrator
//!
//! Owns the backend lifecycle and turns "what should this AI do" into a move,
//! from the backend when possible and from the local heuristics otherwise.

use crate::config::DecisionConfig;
use crate::error::{DecisionError, TransportError};
use crate::health::HealthMonitor;
use crate::protocol::DecideRequest;
use crate::supervisor::BackendProcess;
use crate::transport::{DecisionTransport, HttpTransport};
use mindgames_domain::{GamePhase, GameState, Move, MoveKind, PlayerId, PlayerType};
use mindgames_heuristics::{fallback_move, HeuristicPolicy};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where a decision came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionSource {
    /// The decision backend answered
    Backend,
    /// The local heuristics answered, for the given reason
    Fallback(String),
}

impl DecisionSource {
    /// True for [`DecisionSource::Fallback`]
    pub fn is_fallback(&self) -> bool {
        matches!(self, DecisionSource::Fallback(_))
    }
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionSource::Backend => f.write_str("backend"),
            DecisionSource::Fallback(reason) => write!(f, "fallback ({})", reason),
        }
    }
}

/// A move together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// The move to submit
    pub mv: Move,
    /// Backend or fallback
    pub source: DecisionSource,
    /// Decide requests sent to the backend
    pub attempts: u32,
}

/// Snapshot of the backend's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStatus {
    /// `initialize()` has completed
    pub initialized: bool,
    /// Latest value of the healthy flag
    pub healthy: bool,
    /// A launched backend process is still running
    pub process_alive: bool,
}

struct Running {
    healthy: watch::Receiver<bool>,
    monitor: HealthMonitor,
    process: Option<BackendProcess>,
}

/// Obtains AI moves from the decision backend, with local fallback
///
/// One explicit instance per application; it holds no global state.
///
/// ```no_run
/// use mindgames_decision::{DecisionConfig, DecisionOrchestrator};
///
/// # async fn example() -> Result<(), mindgames_decision::DecisionError> {
/// let mut orchestrator = DecisionOrchestrator::new(DecisionConfig::default(), Default::default())?;
/// if let Err(e) = orchestrator.initialize().await {
///     eprintln!("AI server unavailable, playing with fallback AI: {}", e);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DecisionOrchestrator<T: DecisionTransport = HttpTransport> {
    config: DecisionConfig,
    policy: HeuristicPolicy,
    transport: Arc<T>,
    running: Option<Running>,
}

impl DecisionOrchestrator<HttpTransport> {
    /// Orchestrator talking HTTP to `config.base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: DecisionConfig, policy: HeuristicPolicy) -> Result<Self, DecisionError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, policy, transport))
    }
}

impl<T: DecisionTransport> DecisionOrchestrator<T> {
    /// Orchestrator over a custom transport
    pub fn with_transport(config: DecisionConfig, policy: HeuristicPolicy, transport: T) -> Self {
        Self {
            config,
            policy,
            transport: Arc::new(transport),
            running: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Bring the backend up and start the health monitor
    ///
    /// With a launch config the backend process is started and polled until
    /// healthy. Without one the orchestrator attaches to whatever is listening
    /// at the base URL; an unreachable backend then starts out unhealthy and
    /// the monitor keeps probing it.
    ///
    /// Calling this twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`DecisionError::BackendNotFound`] if no executable or directory works
    /// - [`DecisionError::Spawn`] if the process cannot be started
    /// - [`DecisionError::ProcessExited`] if it dies before becoming healthy
    /// - [`DecisionError::StartupTimeout`] if it never becomes healthy
    ///
    /// Any started process is stopped before the error is returned.
    pub async fn initialize(&mut self) -> Result<(), DecisionError> {
        if self.running.is_some() {
            info!("Decision orchestrator already initialized");
            return Ok(());
        }

        info!(url = %self.config.normalized_base_url(), "Initializing decision backend");

        let mut process = match &self.config.launch {
            Some(launch) => Some(BackendProcess::launch(launch).await?),
            None => None,
        };

        let startup = match process.as_ref() {
            Some(backend) => self.wait_until_healthy(backend).await.map(|_| true),
            None => Ok(self.transport.health().await),
        };
        let healthy = match startup {
            Ok(healthy) => healthy,
            Err(e) => {
                if let Some(backend) = process.take() {
                    backend.terminate(self.config.shutdown_grace()).await;
                }
                warn!(error = %e, "Decision backend initialization failed");
                return Err(e);
            }
        };

        let (healthy_tx, healthy_rx) = watch::channel(healthy);
        let monitor = HealthMonitor::spawn(
            Arc::clone(&self.transport),
            healthy_tx,
            self.config.health_check_interval(),
            process.as_ref().map(BackendProcess::exit_receiver),
        );

        self.running = Some(Running {
            healthy: healthy_rx,
            monitor,
            process,
        });

        if healthy {
            info!("Decision backend initialized");
        } else {
            warn!("Decision backend not reachable, AI moves will use fallback until it is");
        }
        Ok(())
    }

    async fn wait_until_healthy(&self, process: &BackendProcess) -> Result<(), DecisionError> {
        let started = Instant::now();
        let timeout = self.config.startup_timeout();
        let poll = self.config.startup_poll_interval();
        let report_every = Duration::from_secs(5);
        let mut next_report = report_every;

        info!("Waiting for decision backend to start");
        loop {
            if self.transport.health().await {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Decision backend is ready"
                );
                return Ok(());
            }

            if let Some(status) = process.exit_status() {
                return Err(DecisionError::ProcessExited(status));
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(DecisionError::StartupTimeout(timeout));
            }
            if elapsed >= next_report {
                info!("Still waiting for decision backend ({}s)", elapsed.as_secs());
                next_report += report_every;
            }

            tokio::time::sleep(poll).await;
        }
    }

    /// Move for `player` in `state`
    ///
    /// # Errors
    ///
    /// Only [`DecisionError::NotInitialized`]; backend trouble yields a
    /// fallback move instead.
    pub async fn request_move(
        &self,
        state: &GameState,
        player: PlayerId,
    ) -> Result<Move, DecisionError> {
        self.request_move_detailed(state, player).await.map(|d| d.mv)
    }

    /// Like [`request_move`](Self::request_move), reporting source and attempts
    pub async fn request_move_detailed(
        &self,
        state: &GameState,
        player: PlayerId,
    ) -> Result<Decision, DecisionError> {
        let running = self.running.as_ref().ok_or(DecisionError::NotInitialized)?;

        if !*running.healthy.borrow() {
            warn!("Decision backend unhealthy, using fallback AI");
            return Ok(self.fallback(state, player, "backend unhealthy", 0));
        }

        let player_type = state
            .player(player)
            .map(|p| p.player_type())
            .unwrap_or(PlayerType::AiMedium);
        let request = DecideRequest::new(state, player_type);
        let max_attempts = self.config.retry_attempts;
        let mut last_error = String::from("no attempts configured");

        for attempt in 1..=max_attempts {
            match self.attempt(&request, state.phase, player).await {
                Ok(mv) => {
                    debug!(attempt, action = %mv.kind(), "Decision backend answered");
                    return Ok(Decision {
                        mv,
                        source: DecisionSource::Backend,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "Decision attempt failed");
                    last_error = e.to_string();
                }
            }

            if attempt < max_attempts {
                debug!(delay_ms = self.config.retry_delay_ms, "Retrying decision request");
                tokio::time::sleep(self.config.retry_delay()).await;

                if !self.transport.health().await {
                    warn!(attempt, "Decision backend not responding to health checks");
                    return Ok(self.fallback(state, player, "backend stopped responding", attempt));
                }
            }
        }

        warn!(max_attempts, "All decision attempts failed, using fallback AI");
        Ok(self.fallback(
            state,
            player,
            &format!("all attempts failed: {}", last_error),
            max_attempts,
        ))
    }

    async fn attempt(
        &self,
        request: &DecideRequest,
        phase: GamePhase,
        player: PlayerId,
    ) -> Result<Move, TransportError> {
        let mv = self.transport.decide(request).await?.into_move(player)?;
        let fits = match phase {
            GamePhase::Claim => mv.kind() == MoveKind::Claim,
            GamePhase::Challenge | GamePhase::Resolution => mv.kind() != MoveKind::Claim,
        };
        if fits {
            Ok(mv)
        } else {
            Err(TransportError::Malformed(format!(
                "{} is not a valid move in the {} phase",
                mv.kind(),
                phase
            )))
        }
    }

    fn fallback(
        &self,
        state: &GameState,
        player: PlayerId,
        reason: &str,
        attempts: u32,
    ) -> Decision {
        Decision {
            mv: fallback_move(state, player, &self.policy),
            source: DecisionSource::Fallback(reason.to_string()),
            attempts,
        }
    }

    /// Change the backend's difficulty tier (sent lowercase)
    ///
    /// # Errors
    ///
    /// [`DecisionError::NotInitialized`] before `initialize()`, or the
    /// transport error if the backend rejects the request.
    pub async fn set_difficulty(&self, difficulty: &str) -> Result<(), DecisionError> {
        if self.running.is_none() {
            return Err(DecisionError::NotInitialized);
        }
        self.transport.set_difficulty(difficulty).await?;
        info!(difficulty = %difficulty.to_lowercase(), "Decision backend difficulty set");
        Ok(())
    }

    /// True once `initialize()` has succeeded and until `shutdown()`
    pub fn is_initialized(&self) -> bool {
        self.running.is_some()
    }

    /// Latest value of the healthy flag
    pub fn is_healthy(&self) -> bool {
        self.running
            .as_ref()
            .map(|r| *r.healthy.borrow())
            .unwrap_or(false)
    }

    /// Current backend status
    pub fn status(&self) -> BackendStatus {
        match &self.running {
            Some(running) => BackendStatus {
                initialized: true,
                healthy: *running.healthy.borrow(),
                process_alive: running
                    .process
                    .as_ref()
                    .map(BackendProcess::is_alive)
                    .unwrap_or(false),
            },
            None => BackendStatus::default(),
        }
    }

    /// Stop the monitor and the backend process; safe to call at any time
    pub async fn shutdown(&mut self) {
        let Some(running) = self.running.take() else {
            debug!("Decision orchestrator not running, nothing to shut down");
            return;
        };

        running.monitor.stop().await;
        if let Some(process) = running.process {
            process.terminate(self.config.shutdown_grace()).await;
        }
        info!("Decision orchestrator shut down");
    }
}
