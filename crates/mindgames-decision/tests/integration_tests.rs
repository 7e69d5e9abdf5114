//! Integration tests for the orchestrator against a stub decision server

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use mindgames_decision::{DecisionConfig, DecisionOrchestrator, DecisionSource};
use mindgames_domain::{GameState, MoveKind, Player, PlayerType};
use mindgames_heuristics::{fallback_move, HeuristicPolicy};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared knobs and counters of the stub server
#[derive(Clone, Default)]
struct Stub {
    healthy: Arc<AtomicBool>,
    fail_decide: Arc<AtomicBool>,
    go_down_on_decide: Arc<AtomicBool>,
    decide_calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<Value>>>,
    difficulty: Arc<Mutex<Option<String>>>,
}

impl Stub {
    fn healthy() -> Self {
        let stub = Self::default();
        stub.healthy.store(true, Ordering::SeqCst);
        stub
    }

    fn decide_calls(&self) -> usize {
        self.decide_calls.load(Ordering::SeqCst)
    }
}

async fn health(State(stub): State<Stub>) -> StatusCode {
    if stub.healthy.load(Ordering::SeqCst) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn decide(State(stub): State<Stub>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    stub.decide_calls.fetch_add(1, Ordering::SeqCst);
    *stub.last_request.lock().unwrap() = Some(body.clone());

    if stub.go_down_on_decide.load(Ordering::SeqCst) {
        stub.healthy.store(false, Ordering::SeqCst);
    }
    if stub.fail_decide.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "model crashed"})),
        );
    }

    let response = if body["game_state"]["phase"] == "CLAIM" {
        json!({
            "action": "CLAIM",
            "confidence": 0.82,
            "claim_data": {"description": "The treaty is forged", "type": "ACCUSATION", "boldness": 0.65}
        })
    } else {
        json!({"action": "accept", "confidence": 0.7})
    };
    (StatusCode::OK, Json(response))
}

async fn set_difficulty(State(stub): State<Stub>, Json(body): Json<Value>) -> Json<Value> {
    let difficulty = body["difficulty"].as_str().unwrap_or_default().to_string();
    *stub.difficulty.lock().unwrap() = Some(difficulty.clone());
    Json(json!({"status": "ok", "difficulty": difficulty}))
}

/// Serve the stub on an ephemeral port and return its base URL
async fn spawn_stub(stub: Stub) -> String {
    let app = Router::new()
        .route("/health", get(health))
        .route("/ai/decide", post(decide))
        .route("/ai/set_difficulty", post(set_difficulty))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn test_config(base_url: &str) -> DecisionConfig {
    DecisionConfig {
        retry_delay_ms: 10,
        health_check_interval_ms: 50,
        health_check_timeout_ms: 500,
        request_timeout_ms: 2_000,
        ..DecisionConfig::attach(base_url)
    }
}

async fn start(stub: &Stub) -> DecisionOrchestrator {
    let url = spawn_stub(stub.clone()).await;
    let mut orchestrator =
        DecisionOrchestrator::new(test_config(&url), HeuristicPolicy::default()).unwrap();
    orchestrator.initialize().await.unwrap();
    orchestrator
}

fn game() -> GameState {
    GameState::new(
        Player::new("Alice", PlayerType::Human),
        Player::new("Bot", PlayerType::AiHard),
    )
}

async fn wait_until<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_backend_decision() {
    let stub = Stub::healthy();
    let mut orchestrator = start(&stub).await;
    let state = game();

    let decision = orchestrator
        .request_move_detailed(&state, state.player2.id())
        .await
        .unwrap();

    assert_eq!(decision.source, DecisionSource::Backend);
    assert_eq!(decision.attempts, 1);
    assert_eq!(decision.mv.kind(), MoveKind::Claim);
    assert_eq!(decision.mv.confidence(), 0.82);
    assert_eq!(decision.mv.claim().unwrap().boldness(), 0.65);

    let request = stub.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request["player_type"], "AI_HARD");
    assert_eq!(request["game_state"]["player1_trust"], 50);
    assert!(request["game_state"]["current_claim"].is_null());

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn test_unhealthy_backend_gets_no_decide_calls() {
    let stub = Stub::healthy();
    let mut orchestrator = start(&stub).await;
    assert!(orchestrator.is_healthy());

    stub.healthy.store(false, Ordering::SeqCst);
    wait_until(|| !orchestrator.is_healthy()).await;

    let state = game();
    let decision = orchestrator
        .request_move_detailed(&state, state.player2.id())
        .await
        .unwrap();

    assert!(decision.source.is_fallback());
    assert_eq!(stub.decide_calls(), 0);
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn test_failed_attempts_then_fallback() {
    let stub = Stub::healthy();
    stub.fail_decide.store(true, Ordering::SeqCst);
    let mut orchestrator = start(&stub).await;
    let state = game();

    let mv = orchestrator.request_move(&state, state.player2.id()).await.unwrap();

    assert_eq!(stub.decide_calls(), 3);
    assert_eq!(
        mv,
        fallback_move(&state, state.player2.id(), &HeuristicPolicy::default())
    );
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn test_health_probe_between_attempts_stops_retries() {
    let stub = Stub::healthy();
    stub.fail_decide.store(true, Ordering::SeqCst);
    stub.go_down_on_decide.store(true, Ordering::SeqCst);
    let mut orchestrator = start(&stub).await;
    let state = game();

    let decision = orchestrator
        .request_move_detailed(&state, state.player2.id())
        .await
        .unwrap();

    assert!(decision.source.is_fallback());
    assert_eq!(decision.attempts, 1);
    assert_eq!(stub.decide_calls(), 1);
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn test_recovery_is_picked_up_by_monitor() {
    let stub = Stub::default();
    let mut orchestrator = start(&stub).await;
    assert!(!orchestrator.is_healthy());

    stub.healthy.store(true, Ordering::SeqCst);
    wait_until(|| orchestrator.is_healthy()).await;

    let mut state = game();
    state.phase = mindgames_domain::GamePhase::Challenge;
    let decision = orchestrator
        .request_move_detailed(&state, state.player2.id())
        .await
        .unwrap();
    assert_eq!(decision.source, DecisionSource::Backend);
    assert_eq!(decision.mv.kind(), MoveKind::Accept);
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn test_set_difficulty() {
    let stub = Stub::healthy();
    let mut orchestrator = start(&stub).await;

    orchestrator.set_difficulty("Hard").await.unwrap();
    assert_eq!(stub.difficulty.lock().unwrap().as_deref(), Some("hard"));
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn test_attach_to_nothing() {
    // Grab a free port and release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut orchestrator =
        DecisionOrchestrator::new(test_config(&url), HeuristicPolicy::default()).unwrap();
    orchestrator.initialize().await.unwrap();

    let status = orchestrator.status();
    assert!(status.initialized);
    assert!(!status.healthy);

    let state = game();
    let mv = orchestrator.request_move(&state, state.player1.id()).await.unwrap();
    assert_eq!(mv.player(), state.player1.id());

    orchestrator.shutdown().await;
    assert!(!orchestrator.status().initialized);
}
