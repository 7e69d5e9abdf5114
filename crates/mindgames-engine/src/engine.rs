//! Phase state machine

use crate::config::{RulesConfig, TruthModel, TurnOrder};
use crate::error::EngineError;
use crate::random::RngSource;
use mindgames_domain::rules::{
    ACCEPT_CLAIMANT_DELTA, CAUGHT_BLUFF_DELTA, DEFEAT_THRESHOLD, FAILED_CHALLENGE_CLAIMANT_DELTA,
    FAILED_CHALLENGE_DELTA, MAX_ROUNDS, SUCCESSFUL_CHALLENGE_DELTA, VICTORY_THRESHOLD,
};
use mindgames_domain::{
    GameEvent, GameObserver, GamePhase, GameState, HistoricalMove, Move, MoveKind, Player,
    PlayerSlot, RandomSource, RoundResult,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Victory message when the round limit is exhausted
pub const MAX_ROUNDS_MESSAGE: &str = "Maximum rounds reached";

/// Runs one game at a time
///
/// Starting a new game discards the previous one. Observers survive across
/// games.
pub struct GameEngine {
    config: RulesConfig,
    rng: Box<dyn RandomSource>,
    state: Option<GameState>,
    observers: Vec<Arc<dyn GameObserver>>,
}

impl GameEngine {
    /// Engine drawing from `config.seed`, or from entropy when unset
    pub fn new(config: RulesConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_random_source(config, RngSource::seeded(seed)),
            None => Self::with_random_source(config, RngSource::from_entropy()),
        }
    }

    /// Engine drawing from the given source
    pub fn with_random_source(config: RulesConfig, rng: impl RandomSource + 'static) -> Self {
        Self {
            config,
            rng: Box::new(rng),
            state: None,
            observers: Vec::new(),
        }
    }

    /// Active rules
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Register an observer for all future events
    pub fn add_observer(&mut self, observer: Arc<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Reset to round 1, Claim phase, player1 to act
    pub fn start_new_game(&mut self, player1: Player, player2: Player) -> &GameState {
        info!(
            player1 = %player1.name(),
            player2 = %player2.name(),
            turn_order = ?self.config.turn_order,
            "Starting new game"
        );
        let state = GameState::new(player1, player2);
        notify(&self.observers, GameEvent::GameStarted, &state);
        self.state.insert(state)
    }

    /// Current state, if a game has been started
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> Option<GameState> {
        self.state.clone()
    }

    /// True once the running game has ended
    pub fn is_game_over(&self) -> bool {
        self.state.as_ref().map(|s| s.game_over).unwrap_or(false)
    }

    /// The player expected to submit the next move
    pub fn current_player(&self) -> Option<&Player> {
        self.state.as_ref().map(GameState::current)
    }

    /// Apply one move
    ///
    /// Validation happens before any mutation: on error the state is exactly
    /// as it was.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NoActiveGame`] before `start_new_game`
    /// - [`EngineError::GameOver`] after the game ended
    /// - [`EngineError::NotYourTurn`] for a move by anyone but the current player
    /// - [`EngineError::WrongMoveForPhase`] when the move kind does not fit the phase
    pub fn process_move(&mut self, mv: &Move) -> Result<RoundResult, EngineError> {
        let Self {
            config,
            rng,
            state,
            observers,
        } = self;
        let state = state.as_mut().ok_or(EngineError::NoActiveGame)?;
        let actor = validate(state, mv)?;

        debug!(
            round = state.current_round,
            phase = %state.phase,
            action = %mv.kind(),
            player = %state.player_in(actor).name(),
            "Processing move"
        );

        let (result, net_change) = match state.phase {
            GamePhase::Claim => apply_claim(state, mv, actor, config.turn_order),
            GamePhase::Challenge => apply_response(state, mv, actor, rng.as_mut(), &config.truth),
            GamePhase::Resolution => apply_resolution(state, actor, config.turn_order, observers),
        };

        let round = result_round(state, &result);
        let name = state.player_in(actor).name().to_string();
        state
            .move_history
            .push(HistoricalMove::new(round, name, mv.kind().as_str(), net_change));

        if !state.game_over {
            if let Some(message) = check_thresholds(state) {
                end_game(state, message);
            }
        }

        notify(observers, GameEvent::MoveProcessed, state);
        if state.game_over {
            info!(
                message = state.victory_message.as_deref().unwrap_or_default(),
                player1 = state.player1.trust_score(),
                player2 = state.player2.trust_score(),
                "Game over"
            );
            notify(observers, GameEvent::GameEnded, state);
        }

        Ok(result)
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// First satisfied end condition, checked in priority order
///
/// Player1 victory, player2 victory, player1 defeat, player2 defeat.
pub fn check_thresholds(state: &GameState) -> Option<String> {
    let p1 = &state.player1;
    let p2 = &state.player2;

    if p1.trust_score() >= VICTORY_THRESHOLD {
        Some(format!("{} achieved victory through trust!", p1.name()))
    } else if p2.trust_score() >= VICTORY_THRESHOLD {
        Some(format!("{} achieved victory through trust!", p2.name()))
    } else if p1.trust_score() <= DEFEAT_THRESHOLD {
        Some(format!("{} wins! {} lost all credibility.", p2.name(), p1.name()))
    } else if p2.trust_score() <= DEFEAT_THRESHOLD {
        Some(format!("{} wins! {} lost all credibility.", p1.name(), p2.name()))
    } else {
        None
    }
}

fn validate(state: &GameState, mv: &Move) -> Result<PlayerSlot, EngineError> {
    if state.game_over {
        return Err(EngineError::GameOver);
    }

    let actor = match state.slot_of(mv.player()) {
        Some(slot) if mv.player() == state.current_player => slot,
        _ => {
            return Err(EngineError::NotYourTurn {
                expected: state.current().name().to_string(),
            })
        }
    };

    let fits = match state.phase {
        GamePhase::Claim => mv.kind() == MoveKind::Claim,
        GamePhase::Challenge => matches!(mv.kind(), MoveKind::Challenge | MoveKind::Accept),
        GamePhase::Resolution => mv.kind() != MoveKind::Claim,
    };
    if !fits {
        return Err(EngineError::WrongMoveForPhase {
            phase: state.phase,
            kind: mv.kind(),
        });
    }

    Ok(actor)
}

fn apply_claim(
    state: &mut GameState,
    mv: &Move,
    actor: PlayerSlot,
    turn_order: TurnOrder,
) -> (RoundResult, i32) {
    let claim = mv.claim().cloned();
    let description = claim
        .as_ref()
        .map(|c| c.description().to_string())
        .unwrap_or_default();

    state.current_claim = claim;
    state.claimant = Some(mv.player());
    state.phase = state.phase.next();
    if turn_order == TurnOrder::Responder {
        state.current_player = state.player_in(actor.opponent()).id();
    }

    let result = RoundResult {
        success: true,
        message: format!("Claim registered: {}", description),
        trust_change: 0,
        player1_score: state.player1.trust_score(),
        player2_score: state.player2.trust_score(),
        ..RoundResult::default()
    };
    (result, 0)
}

fn apply_response(
    state: &mut GameState,
    mv: &Move,
    actor: PlayerSlot,
    rng: &mut dyn RandomSource,
    truth: &TruthModel,
) -> (RoundResult, i32) {
    let round = state.current_round;
    let claimant = state
        .claimant
        .and_then(|id| state.slot_of(id))
        .unwrap_or(actor);
    let boldness = state.current_claim.as_ref().map(|c| c.boldness()).unwrap_or(0.0);

    let mut net_change = 0;
    let mut apply = |state: &mut GameState, slot: PlayerSlot, delta: i32| {
        state.player_in_mut(slot).apply_trust(round, delta);
        if slot == actor {
            net_change += delta;
        }
    };

    let (trust_change, message) = if mv.is_challenge() {
        let p = truth.probability(state.player_in(claimant).trust_score(), boldness);
        let draw = rng.next_unit();
        let claim_true = draw < p;
        debug!(probability = p, draw, claim_true, "Claim truth resolved");

        if claim_true {
            apply(state, actor, FAILED_CHALLENGE_DELTA);
            apply(state, claimant, FAILED_CHALLENGE_CLAIMANT_DELTA);
            state.player_in_mut(claimant).record_successful_bluff();
            state.player_in_mut(actor).record_failed_challenge();
            (FAILED_CHALLENGE_DELTA, "Challenge failed! Claim was true.")
        } else {
            apply(state, actor, SUCCESSFUL_CHALLENGE_DELTA);
            apply(state, claimant, CAUGHT_BLUFF_DELTA);
            state.player_in_mut(actor).record_successful_challenge();
            state.player_in_mut(claimant).record_failed_bluff();
            (SUCCESSFUL_CHALLENGE_DELTA, "Challenge succeeded! Claim was false.")
        }
    } else {
        apply(state, claimant, ACCEPT_CLAIMANT_DELTA);
        (ACCEPT_CLAIMANT_DELTA, "Claim accepted.")
    };

    state.phase = state.phase.next();

    let result = RoundResult {
        success: true,
        message: message.to_string(),
        trust_change,
        player1_score: state.player1.trust_score(),
        player2_score: state.player2.trust_score(),
        ..RoundResult::default()
    };
    (result, net_change)
}

fn apply_resolution(
    state: &mut GameState,
    actor: PlayerSlot,
    turn_order: TurnOrder,
    observers: &[Arc<dyn GameObserver>],
) -> (RoundResult, i32) {
    let result = RoundResult {
        success: true,
        message: format!("Round {} complete.", state.current_round),
        trust_change: 0,
        round_complete: true,
        player1_score: state.player1.trust_score(),
        player2_score: state.player2.trust_score(),
    };
    notify(observers, GameEvent::RoundComplete, state);

    let next_claimant = match turn_order {
        TurnOrder::Round => actor.opponent(),
        TurnOrder::Responder => state
            .claimant
            .and_then(|id| state.slot_of(id))
            .map(|slot| slot.opponent())
            .unwrap_or(actor),
    };

    // A game ended by the round limit keeps its last claim pending
    if state.current_round + 1 > MAX_ROUNDS {
        end_game(state, MAX_ROUNDS_MESSAGE.to_string());
    } else {
        state.current_claim = None;
        state.claimant = None;
        state.current_round += 1;
        state.phase = state.phase.next();
        state.current_player = state.player_in(next_claimant).id();
    }

    (result, 0)
}

/// Round the move belongs to; a resolution has already advanced the counter
fn result_round(state: &GameState, result: &RoundResult) -> u32 {
    if result.round_complete && !state.game_over {
        state.current_round - 1
    } else {
        state.current_round
    }
}

fn end_game(state: &mut GameState, message: String) {
    state.game_over = true;
    state.victory_message = Some(message);
}

fn notify(observers: &[Arc<dyn GameObserver>], event: GameEvent, state: &GameState) {
    for observer in observers {
        observer.on_game_event(event, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgames_domain::{Claim, ClaimType, FixedDraw, PlayerType};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<GameEvent>>,
    }

    impl GameObserver for Recorder {
        fn on_game_event(&self, event: GameEvent, _state: &GameState) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn engine(draw: f64, turn_order: TurnOrder) -> GameEngine {
        let config = RulesConfig {
            turn_order,
            ..RulesConfig::default()
        };
        let mut engine = GameEngine::with_random_source(config, FixedDraw(draw));
        engine.start_new_game(
            Player::new("Alice", PlayerType::Human),
            Player::new("Bot", PlayerType::AiMedium),
        );
        engine
    }

    fn claim_move(engine: &GameEngine, boldness: f64) -> Move {
        let who = engine.state().unwrap().current_player;
        Move::claiming(who, Claim::new("claim", ClaimType::Prediction, boldness), 0.5)
    }

    fn current(engine: &GameEngine) -> mindgames_domain::PlayerId {
        engine.state().unwrap().current_player
    }

    #[test]
    fn test_no_active_game() {
        let mut engine = GameEngine::with_random_source(RulesConfig::default(), FixedDraw(0.0));
        let mv = Move::accepting(mindgames_domain::PlayerId::new(), 0.5);
        assert_eq!(engine.process_move(&mv), Err(EngineError::NoActiveGame));
        assert!(engine.snapshot().is_none());
    }

    #[test]
    fn test_claim_phase_transition() {
        let mut engine = engine(0.0, TurnOrder::Round);
        let mv = claim_move(&engine, 0.3);
        let result = engine.process_move(&mv).unwrap();

        let state = engine.state().unwrap();
        assert!(result.success);
        assert_eq!(result.trust_change, 0);
        assert_eq!(result.message, "Claim registered: claim");
        assert_eq!(state.phase, GamePhase::Challenge);
        assert_eq!(state.claimant, Some(state.player1.id()));
        assert!(state.has_pending_claim());
        assert_eq!(state.player1.trust_score(), 50);
    }

    #[test]
    fn test_wrong_move_for_phase() {
        let mut engine = engine(0.0, TurnOrder::Round);
        let who = current(&engine);
        let before = engine.snapshot();

        assert_eq!(
            engine.process_move(&Move::challenging(who, 0.5)),
            Err(EngineError::WrongMoveForPhase {
                phase: GamePhase::Claim,
                kind: MoveKind::Challenge,
            })
        );
        assert_eq!(engine.snapshot(), before);

        let mv = claim_move(&engine, 0.3);
        engine.process_move(&mv).unwrap();
        let again = claim_move(&engine, 0.3);
        assert!(matches!(
            engine.process_move(&again),
            Err(EngineError::WrongMoveForPhase { .. })
        ));
    }

    #[test]
    fn test_not_your_turn_leaves_state_untouched() {
        let mut engine = engine(0.0, TurnOrder::Round);
        let bot = engine.state().unwrap().player2.id();
        let before = engine.snapshot();

        let mv = Move::claiming(bot, Claim::new("mine", ClaimType::Alliance, 0.2), 0.5);
        assert_eq!(
            engine.process_move(&mv),
            Err(EngineError::NotYourTurn {
                expected: "Alice".to_string()
            })
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_accept_rewards_claimant() {
        let mut engine = engine(0.0, TurnOrder::Responder);
        let mv = claim_move(&engine, 0.5);
        engine.process_move(&mv).unwrap();

        let bot = current(&engine);
        assert_eq!(bot, engine.state().unwrap().player2.id());
        let result = engine.process_move(&Move::accepting(bot, 0.5)).unwrap();

        let state = engine.state().unwrap();
        assert_eq!(result.trust_change, 5);
        assert_eq!(result.message, "Claim accepted.");
        assert_eq!(state.player1.trust_score(), 55);
        assert_eq!(state.player2.trust_score(), 50);
        assert_eq!(state.phase, GamePhase::Resolution);
        // the accepting player's own trust did not move
        assert_eq!(state.move_history.last().unwrap().trust_change, 0);
    }

    #[test]
    fn test_failed_challenge() {
        // draw 0.0 < any p: the claim is true
        let mut engine = engine(0.0, TurnOrder::Responder);
        let mv = claim_move(&engine, 0.9);
        engine.process_move(&mv).unwrap();
        let bot = current(&engine);

        let result = engine.process_move(&Move::challenging(bot, 0.8)).unwrap();
        let state = engine.state().unwrap();

        assert_eq!(result.trust_change, -15);
        assert_eq!(result.message, "Challenge failed! Claim was true.");
        assert_eq!(state.player1.trust_score(), 60);
        assert_eq!(state.player2.trust_score(), 35);
        assert_eq!(state.player1.successful_bluffs(), 1);
        assert_eq!(state.player2.failed_challenges(), 1);
        assert_eq!(state.move_history.last().unwrap().trust_change, -15);
    }

    #[test]
    fn test_successful_challenge() {
        // draw 0.95 ≥ max p: the claim is a bluff
        let mut engine = engine(0.95, TurnOrder::Responder);
        let mv = claim_move(&engine, 0.9);
        engine.process_move(&mv).unwrap();
        let bot = current(&engine);

        let result = engine.process_move(&Move::challenging(bot, 0.8)).unwrap();
        let state = engine.state().unwrap();

        assert_eq!(result.trust_change, 15);
        assert_eq!(state.player1.trust_score(), 30);
        assert_eq!(state.player2.trust_score(), 65);
        assert_eq!(state.player2.successful_challenges(), 1);
        assert_eq!(state.player1.failed_bluffs(), 1);
    }

    #[test]
    fn test_round_order_self_response() {
        let mut engine = engine(0.0, TurnOrder::Round);
        let alice = current(&engine);
        let mv = claim_move(&engine, 0.2);
        engine.process_move(&mv).unwrap();
        assert_eq!(current(&engine), alice);

        engine.process_move(&Move::challenging(alice, 0.5)).unwrap();
        let state = engine.state().unwrap();
        // −15 as challenger, +10 as claimant
        assert_eq!(state.player1.trust_score(), 45);
        assert_eq!(state.move_history.last().unwrap().trust_change, -5);
    }

    #[test]
    fn test_resolution_advances_round_and_flips_turn() {
        let mut engine = engine(0.0, TurnOrder::Round);
        let alice = current(&engine);
        let mv = claim_move(&engine, 0.2);
        engine.process_move(&mv).unwrap();
        engine.process_move(&Move::accepting(alice, 0.5)).unwrap();

        let result = engine.process_move(&Move::accepting(alice, 0.5)).unwrap();
        let state = engine.state().unwrap();

        assert!(result.round_complete);
        assert_eq!(result.message, "Round 1 complete.");
        assert_eq!(result.player1_score, 55);
        assert_eq!(result.player2_score, 50);
        assert_eq!(state.current_round, 2);
        assert_eq!(state.phase, GamePhase::Claim);
        assert!(state.current_claim.is_none());
        assert!(state.claimant.is_none());
        assert_eq!(state.current_player, state.player2.id());
        assert_eq!(state.move_history.len(), 3);
        assert!(state.move_history.iter().all(|m| m.round == 1));
    }

    #[test]
    fn test_responder_order_next_claimant() {
        let mut engine = engine(0.0, TurnOrder::Responder);
        let mv = claim_move(&engine, 0.2);
        engine.process_move(&mv).unwrap();
        let bot = current(&engine);
        engine.process_move(&Move::accepting(bot, 0.5)).unwrap();
        assert_eq!(current(&engine), bot);
        engine.process_move(&Move::accepting(bot, 0.5)).unwrap();

        let state = engine.state().unwrap();
        assert_eq!(state.current_round, 2);
        assert_eq!(state.current_player, state.player2.id());
    }

    #[test]
    fn test_observer_events() {
        let recorder = Arc::new(Recorder::default());
        let mut engine = GameEngine::with_random_source(RulesConfig::default(), FixedDraw(0.0));
        engine.add_observer(recorder.clone());
        engine.start_new_game(
            Player::new("Alice", PlayerType::Human),
            Player::new("Bot", PlayerType::AiEasy),
        );
        let alice = current(&engine);
        let mv = claim_move(&engine, 0.2);
        engine.process_move(&mv).unwrap();
        engine.process_move(&Move::accepting(alice, 0.5)).unwrap();
        engine.process_move(&Move::accepting(alice, 0.5)).unwrap();

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![
                GameEvent::GameStarted,
                GameEvent::MoveProcessed,
                GameEvent::MoveProcessed,
                GameEvent::RoundComplete,
                GameEvent::MoveProcessed,
            ]
        );
    }

    #[test]
    fn test_threshold_priority() {
        let mut state = GameState::new(
            Player::with_trust_score("A", PlayerType::Human, 100),
            Player::with_trust_score("B", PlayerType::AiHard, 100),
        );
        assert_eq!(
            check_thresholds(&state).as_deref(),
            Some("A achieved victory through trust!")
        );

        state.player1 = Player::with_trust_score("A", PlayerType::Human, -50);
        assert_eq!(
            check_thresholds(&state).as_deref(),
            Some("B achieved victory through trust!")
        );

        state.player2 = Player::with_trust_score("B", PlayerType::AiHard, -60);
        assert_eq!(
            check_thresholds(&state).as_deref(),
            Some("B wins! A lost all credibility.")
        );

        state.player1 = Player::with_trust_score("A", PlayerType::Human, 0);
        assert_eq!(
            check_thresholds(&state).as_deref(),
            Some("A wins! B lost all credibility.")
        );

        state.player2 = Player::with_trust_score("B", PlayerType::AiHard, -49);
        assert_eq!(check_thresholds(&state), None);
    }
}
