//! Request and response bodies of the decision backend
//!
//! - `GET /health` → 200 when ready
//! - `POST /ai/decide` with [`DecideRequest`] → [`DecideResponse`]
//! - `POST /ai/set_difficulty` with [`SetDifficultyRequest`]

use crate::error::TransportError;
use mindgames_domain::moves::DEFAULT_CONFIDENCE;
use mindgames_domain::{GameState, Move, MoveKind, PlayerType, WireClaim, WireGameState};
use serde::{Deserialize, Serialize};

/// Body of `POST /ai/decide`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecideRequest {
    /// Serialized game state
    pub game_state: WireGameState,
    /// Tier tag of the deciding player (`AI_EASY`, …)
    pub player_type: String,
}

impl DecideRequest {
    /// Request a decision for a player of `player_type` in `state`
    pub fn new(state: &GameState, player_type: PlayerType) -> Self {
        Self {
            game_state: WireGameState::from(state),
            player_type: player_type.as_str().to_string(),
        }
    }
}

/// Body returned by `POST /ai/decide`
///
/// Either a decision (`action`, `confidence`, optional `claim_data`) or an
/// `error` string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecideResponse {
    /// `CLAIM`, `CHALLENGE` or `ACCEPT`, any case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Backend confidence in the move
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Claim payload, required for `CLAIM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_data: Option<WireClaim>,
    /// Set instead of a decision when the backend failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DecideResponse {
    /// A `CLAIM` decision
    pub fn claim(claim: WireClaim, confidence: f64) -> Self {
        Self {
            action: Some("CLAIM".to_string()),
            confidence: Some(confidence),
            claim_data: Some(claim),
            error: None,
        }
    }

    /// A `CHALLENGE` or `ACCEPT` decision
    pub fn action(action: &str, confidence: f64) -> Self {
        Self {
            action: Some(action.to_string()),
            confidence: Some(confidence),
            ..Self::default()
        }
    }

    /// An `{error}` body
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Validate the response and build the move for `player`
    ///
    /// Missing confidence defaults to 0.5.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Backend`] for an `{error}` body
    /// - [`TransportError::Malformed`] for a missing or unknown action, a
    ///   `CLAIM` without `claim_data`, or `claim_data` on another action
    pub fn into_move(self, player: mindgames_domain::PlayerId) -> Result<Move, TransportError> {
        if let Some(error) = self.error {
            return Err(TransportError::Backend(error));
        }

        let action = self
            .action
            .ok_or_else(|| TransportError::Malformed("missing action".to_string()))?;
        let kind = MoveKind::parse(&action).map_err(|e| TransportError::Malformed(e.to_string()))?;
        let confidence = self.confidence.unwrap_or(DEFAULT_CONFIDENCE);
        let claim = self.claim_data.as_ref().map(WireClaim::to_claim);

        Move::new(player, kind, claim, confidence)
            .map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

/// Body of `POST /ai/set_difficulty`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDifficultyRequest {
    /// Lowercase tier name (`easy`, `medium`, `hard`, `ruthless`)
    pub difficulty: String,
}

impl SetDifficultyRequest {
    /// Normalize `difficulty` to lowercase
    pub fn new(difficulty: &str) -> Self {
        Self {
            difficulty: difficulty.trim().to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgames_domain::{ClaimType, Player, PlayerId};

    #[test]
    fn test_request_shape() {
        let state = GameState::new(
            Player::new("Alice", PlayerType::Human),
            Player::new("Bot", PlayerType::AiRuthless),
        );
        let request = DecideRequest::new(&state, state.player2.player_type());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["player_type"], "AI_RUTHLESS");
        assert_eq!(value["game_state"]["round"], 1);
        assert_eq!(value["game_state"]["phase"], "CLAIM");
    }

    #[test]
    fn test_claim_response() {
        let who = PlayerId::new();
        let json = r#"{"action":"claim","confidence":0.8,"claim_data":{"description":"The vault is empty","type":"accusation","boldness":0.7}}"#;
        let response: DecideResponse = serde_json::from_str(json).unwrap();
        let mv = response.into_move(who).unwrap();

        assert_eq!(mv.kind(), MoveKind::Claim);
        assert_eq!(mv.player(), who);
        assert_eq!(mv.confidence(), 0.8);
        let claim = mv.claim().unwrap();
        assert_eq!(claim.claim_type(), ClaimType::Accusation);
        assert_eq!(claim.boldness(), 0.7);
    }

    #[test]
    fn test_claim_without_payload_is_malformed() {
        let response = DecideResponse::action("CLAIM", 0.5);
        assert!(matches!(
            response.into_move(PlayerId::new()),
            Err(TransportError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_action_is_malformed() {
        let response: DecideResponse =
            serde_json::from_str(r#"{"action":"FOLD","confidence":0.5}"#).unwrap();
        assert!(matches!(
            response.into_move(PlayerId::new()),
            Err(TransportError::Malformed(_))
        ));

        let response: DecideResponse = serde_json::from_str(r#"{"confidence":0.5}"#).unwrap();
        assert!(matches!(
            response.into_move(PlayerId::new()),
            Err(TransportError::Malformed(_))
        ));
    }

    #[test]
    fn test_error_body() {
        let response: DecideResponse =
            serde_json::from_str(r#"{"error":"model crashed"}"#).unwrap();
        match response.into_move(PlayerId::new()) {
            Err(TransportError::Backend(msg)) => assert_eq!(msg, "model crashed"),
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_challenge_and_default_confidence() {
        let response: DecideResponse = serde_json::from_str(r#"{"action":"Challenge"}"#).unwrap();
        let mv = response.into_move(PlayerId::new()).unwrap();
        assert!(mv.is_challenge());
        assert_eq!(mv.confidence(), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_difficulty_lowercased() {
        assert_eq!(SetDifficultyRequest::new(" HARD ").difficulty, "hard");
    }
}
