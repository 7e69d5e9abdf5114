//! Integration tests for the search bridge without a native module

use mindgames_domain::{Claim, ClaimType, GamePhase, GameState, Player, PlayerType};
use mindgames_heuristics::HeuristicPolicy;
use mindgames_search::{SearchBackend, SearchBridge, SearchConfig};

/// Bridge whose library name cannot exist anywhere on disk
fn missing_library_bridge() -> SearchBridge {
    let config = SearchConfig {
        library_name: "mindgames_integration_absent".to_string(),
        ..SearchConfig::default()
    };
    SearchBridge::discover(&config, HeuristicPolicy::default())
}

fn state(p1: i32, p2: i32, round: u32) -> GameState {
    let mut state = GameState::new(
        Player::with_trust_score("Alice", PlayerType::Human, p1),
        Player::with_trust_score("Bot", PlayerType::AiHard, p2),
    );
    state.current_round = round;
    state
}

#[test]
fn test_missing_library_selects_heuristic() {
    let bridge = missing_library_bridge();
    assert!(!bridge.is_native());
    assert_eq!(bridge.backend_name(), "heuristic");
    assert!(bridge.library_path().is_none());
    assert!(bridge.version().is_none());
}

#[test]
fn test_evaluation_matches_formula() {
    let bridge = missing_library_bridge();

    // (80 − 50) / 3, early game
    let s = state(80, 50, 4);
    assert_eq!(bridge.evaluate_position(&s, s.player1.id()), 10.0);

    // (80 − 50) / 3 · 1.5, late game
    let s = state(80, 50, 18);
    assert_eq!(bridge.evaluate_position(&s, s.player1.id()), 15.0);

    // (92 − (−41)) / 3 + 20 + 15
    let s = state(92, -41, 2);
    let expected = 133.0 / 3.0 + 35.0;
    assert!((bridge.evaluate_position(&s, s.player1.id()) - expected).abs() < 1e-9);

    // same position from player2: −133/3 − 15 − 20
    assert!((bridge.evaluate_position(&s, s.player2.id()) + expected).abs() < 1e-9);
}

#[test]
fn test_search_fallback_shape() {
    let bridge = missing_library_bridge();
    let mut s = state(60, 40, 6);
    s.phase = GamePhase::Challenge;
    s.current_claim = Some(Claim::new("Alliance offer", ClaimType::Alliance, 0.2));

    let result = bridge.search_best_move(&s, s.player2.id(), 4);
    assert!((result.evaluation + 20.0 / 3.0).abs() < 1e-9);
    assert_eq!(result.nodes_explored, 256);
    assert_eq!(result.depth_reached, 4);
    assert!(result.best_move.is_none());

    let default = bridge.search_default(&s, s.player2.id());
    assert_eq!(default.depth_reached, bridge.default_depth());
}

#[test]
fn test_bridge_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SearchBridge>();
    assert_send_sync::<mindgames_search::NativeSearch>();

    let bridge = std::sync::Arc::new(missing_library_bridge());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let bridge = bridge.clone();
            std::thread::spawn(move || {
                let s = state(50 + i, 50, 1);
                bridge.evaluate_position(&s, s.player1.id())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let value = handle.join().unwrap();
        assert!((value - i as f64 / 3.0).abs() < 1e-9);
    }
}

#[test]
fn test_heuristic_backend_trait() {
    let backend = mindgames_search::HeuristicSearch::default();
    let s = state(50, 50, 1);
    assert_eq!(backend.name(), "heuristic");
    assert_eq!(backend.evaluate(&s, s.player1.id()).unwrap(), 0.0);
}
