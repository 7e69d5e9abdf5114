//! Terminal game loop.
//!
//! The runner owns the game session and both AI bridges. Human turns are read
//! from the line editor; AI turns come from the decision orchestrator, or from
//! the local heuristics when the orchestrator is not running or its move is
//! rejected by the engine.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use mindgames_decision::{DecisionOrchestrator, DecisionTransport, HttpTransport};
use mindgames_domain::moves::DEFAULT_CONFIDENCE;
use mindgames_domain::{
    Claim, ClaimType, GameEvent, GameObserver, GamePhase, GameState, Move, Player, PlayerId,
    PlayerType, RoundResult,
};
use mindgames_engine::{EngineError, GameEngine, GameSession};
use mindgames_heuristics::{fallback_move, HeuristicPolicy};
use mindgames_search::SearchBridge;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const SESSION_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// One line of human input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A move to submit
    Move(Move),
    /// Ask the search bridge for advice
    Hint,
    /// Show the scoreboard
    Stats,
    /// Show the commands for the current phase
    Help,
    /// Leave the game
    Quit,
}

/// Parse a line typed by `player` in `phase`.
///
/// Phase mismatches are left for the engine to reject.
pub fn parse_input(line: &str, phase: GamePhase, player: PlayerId) -> Result<Input> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(command) = parts.first() else {
        return Ok(match phase {
            GamePhase::Resolution => Input::Move(Move::accepting(player, DEFAULT_CONFIDENCE)),
            _ => Input::Help,
        });
    };

    match command.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Ok(Input::Quit),
        "help" | "?" => Ok(Input::Help),
        "hint" => Ok(Input::Hint),
        "stats" | "score" => Ok(Input::Stats),
        "challenge" | "c" => Ok(Input::Move(Move::challenging(player, DEFAULT_CONFIDENCE))),
        "accept" | "a" | "next" | "n" => {
            Ok(Input::Move(Move::accepting(player, DEFAULT_CONFIDENCE)))
        }
        "claim" => parse_claim(&parts[1..], player),
        other => Err(CliError::InvalidInput(format!("Unknown command: {}", other))),
    }
}

fn parse_claim(args: &[&str], player: PlayerId) -> Result<Input> {
    const USAGE: &str = "Usage: claim <type> <boldness 0-1> <text...>";

    if args.len() < 3 {
        return Err(CliError::InvalidInput(USAGE.to_string()));
    }

    let claim_type = match args[0].to_lowercase().as_str() {
        "information" | "info" => ClaimType::Information,
        "prediction" => ClaimType::Prediction,
        "accusation" => ClaimType::Accusation,
        "alliance" => ClaimType::Alliance,
        other => {
            return Err(CliError::InvalidInput(format!(
                "Unknown claim type: {}",
                other
            )))
        }
    };

    let boldness: f64 = args[1]
        .parse()
        .map_err(|_| CliError::InvalidInput(USAGE.to_string()))?;
    if !(0.0..=1.0).contains(&boldness) {
        return Err(CliError::InvalidInput(
            "Boldness must be between 0 and 1".to_string(),
        ));
    }

    let claim = Claim::new(args[2..].join(" "), claim_type, boldness);
    Ok(Input::Move(Move::claiming(player, claim, DEFAULT_CONFIDENCE)))
}

/// Mirrors game events into the log.
struct TraceObserver;

impl GameObserver for TraceObserver {
    fn on_game_event(&self, event: GameEvent, state: &GameState) {
        match event {
            GameEvent::GameEnded => info!(
                message = state.victory_message.as_deref().unwrap_or_default(),
                round = state.current_round,
                "Game ended"
            ),
            _ => debug!(
                event = event.as_str(),
                round = state.current_round,
                phase = %state.phase,
                "Game event"
            ),
        }
    }
}

/// Line editor with history loaded from `history_path`.
///
/// Creates the history directory when missing. A history file that cannot be
/// read is ignored.
pub fn open_editor(history_path: &Path, history_size: usize) -> Result<DefaultEditor> {
    if let Some(dir) = history_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let config = rustyline::Config::builder()
        .max_history_size(history_size)?
        .build();
    let mut editor = DefaultEditor::with_config(config)?;
    let _ = editor.load_history(history_path);
    Ok(editor)
}

/// Drives a game in the terminal.
pub struct GameRunner<T: DecisionTransport = HttpTransport> {
    session: GameSession,
    orchestrator: DecisionOrchestrator<T>,
    search: SearchBridge,
    policy: HeuristicPolicy,
    formatter: Formatter,
    ai_move_delay: Duration,
}

impl<T: DecisionTransport> GameRunner<T> {
    /// Create a runner; the orchestrator may or may not be initialized.
    pub fn new(
        mut engine: GameEngine,
        orchestrator: DecisionOrchestrator<T>,
        search: SearchBridge,
        policy: HeuristicPolicy,
        formatter: Formatter,
    ) -> Self {
        engine.add_observer(Arc::new(TraceObserver));
        Self {
            session: GameSession::new(engine),
            orchestrator,
            search,
            policy,
            formatter,
            ai_move_delay: Duration::ZERO,
        }
    }

    /// Pause after every AI move in AI-vs-AI games.
    pub fn with_ai_move_delay(mut self, delay: Duration) -> Self {
        self.ai_move_delay = delay;
        self
    }

    /// Let two AI players play a full game; returns the final state.
    pub async fn play_ai_vs_ai(&self, first: PlayerType, second: PlayerType) -> Result<GameState> {
        self.apply_difficulty(first).await;

        let state = self
            .session
            .start_new_game(
                Player::new("AI Alpha", first),
                Player::new("AI Beta", second),
            )
            .await;
        println!("{}", self.scoreboard(&state));

        loop {
            let state = self.current_state().await?;
            if state.game_over {
                break;
            }
            if state.phase == GamePhase::Claim {
                println!("{}", self.formatter.banner(&state));
            }

            let result = self.play_ai_turn(&state).await?;
            println!("{}", self.formatter.round_result(&result));

            if !self.ai_move_delay.is_zero() {
                tokio::time::sleep(self.ai_move_delay).await;
            }
        }

        self.finish().await
    }

    /// Play against the AI; returns `None` if the human quits early.
    pub async fn play_interactive(
        &self,
        name: &str,
        opponent: PlayerType,
        editor: &mut DefaultEditor,
    ) -> Result<Option<GameState>> {
        self.apply_difficulty(opponent).await;

        let state = self
            .session
            .start_new_game(
                Player::new(name, PlayerType::Human),
                Player::new("AI", opponent),
            )
            .await;
        println!("{}", self.scoreboard(&state));
        println!("{}", self.formatter.phase_help(state.phase));

        loop {
            let state = self.current_state().await?;
            if state.game_over {
                break;
            }

            if state.current().player_type().is_ai() {
                let result = self.play_ai_turn(&state).await?;
                println!("{}", self.formatter.round_result(&result));
                continue;
            }

            let prompt = format!("[R{} {}] {}> ", state.current_round, state.phase, name);
            let line = match editor.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("{}", self.formatter.info("Use 'quit' to leave the game"));
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let line = line.trim();
            if !line.is_empty() {
                editor.add_history_entry(line).ok();
            }

            match parse_input(line, state.phase, state.current_player) {
                Ok(Input::Move(mv)) => match self.session.process_move(Some(mv)).await {
                    Ok(result) => {
                        println!("{}", self.formatter.round_result(&result));
                        if result.round_complete {
                            let state = self.current_state().await?;
                            println!("{}", self.scoreboard(&state));
                        }
                    }
                    Err(e) => eprintln!("{}", self.formatter.error(&e.to_string())),
                },
                Ok(Input::Hint) => println!("{}", self.hint(&state)),
                Ok(Input::Stats) => println!("{}", self.scoreboard(&state)),
                Ok(Input::Help) => println!("{}", self.formatter.phase_help(state.phase)),
                Ok(Input::Quit) => return Ok(None),
                Err(e) => eprintln!("{}", self.formatter.error(&e.to_string())),
            }
        }

        self.finish().await.map(Some)
    }

    /// Stop the session and the decision backend.
    pub async fn shutdown(mut self) {
        self.session.shutdown(SESSION_SHUTDOWN_GRACE).await;
        self.orchestrator.shutdown().await;
    }

    async fn current_state(&self) -> Result<GameState> {
        Ok(self
            .session
            .snapshot()
            .await
            .ok_or(EngineError::NoActiveGame)?)
    }

    async fn finish(&self) -> Result<GameState> {
        let state = self.current_state().await?;
        println!("{}", self.formatter.game_over(&state));
        println!("{}", self.scoreboard(&state));
        Ok(state)
    }

    async fn apply_difficulty(&self, opponent: PlayerType) {
        let Some(difficulty) = opponent.difficulty() else {
            return;
        };
        if !self.orchestrator.is_initialized() {
            return;
        }
        if let Err(e) = self.orchestrator.set_difficulty(difficulty).await {
            warn!(error = %e, difficulty, "Could not set AI difficulty");
        }
    }

    /// Decide and submit the current AI player's move.
    async fn play_ai_turn(&self, state: &GameState) -> Result<RoundResult> {
        let player = state.current_player;
        let mv = self.ai_move(state, player).await;
        self.announce(state, &mv);

        match self.session.process_move(Some(mv)).await {
            Ok(result) => Ok(result),
            Err(e @ (EngineError::NotYourTurn { .. } | EngineError::WrongMoveForPhase { .. })) => {
                warn!(error = %e, "AI move rejected, using fallback AI");
                let mv = fallback_move(state, player, &self.policy);
                self.announce(state, &mv);
                Ok(self.session.process_move(Some(mv)).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ai_move(&self, state: &GameState, player: PlayerId) -> Move {
        match self.orchestrator.request_move_detailed(state, player).await {
            Ok(decision) => {
                debug!(
                    source = %decision.source,
                    attempts = decision.attempts,
                    action = %decision.mv.kind(),
                    "AI move decided"
                );
                decision.mv
            }
            Err(e) => {
                debug!(error = %e, "Decision orchestrator unavailable, using fallback AI");
                fallback_move(state, player, &self.policy)
            }
        }
    }

    fn announce(&self, state: &GameState, mv: &Move) {
        if let Some(player) = state.player(mv.player()) {
            println!("{}", self.formatter.describe_move(player, mv));
        }
    }

    fn scoreboard(&self, state: &GameState) -> String {
        let evaluations = (
            self.search.evaluate_position(state, state.player1.id()),
            self.search.evaluate_position(state, state.player2.id()),
        );
        self.formatter.scoreboard(state, Some(evaluations))
    }

    fn hint(&self, state: &GameState) -> String {
        let result = self.search.search_default(state, state.current_player);
        let suggestion = match &result.best_move {
            Some(hint) => format!("{} ({:.0}% confident)", hint.action, hint.confidence * 100.0),
            None => fallback_move(state, state.current_player, &self.policy)
                .kind()
                .to_string(),
        };
        self.formatter.info(&format!(
            "Position {:+.1} after {} nodes at depth {} ({}). Suggested: {}",
            result.evaluation,
            result.nodes_explored,
            result.depth_reached,
            self.search.backend_name(),
            suggestion
        ))
    }
}
