//! Network seam between the orchestrator and the decision backend

use crate::config::DecisionConfig;
use crate::error::TransportError;
use crate::protocol::{DecideRequest, DecideResponse, SetDifficultyRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operations the orchestrator needs from a decision backend
#[async_trait]
pub trait DecisionTransport: Send + Sync + 'static {
    /// Point-in-time health probe; any failure reads as unhealthy
    async fn health(&self) -> bool;

    /// Ask for a decision
    async fn decide(&self, request: &DecideRequest) -> Result<DecideResponse, TransportError>;

    /// Change the backend's difficulty tier
    async fn set_difficulty(&self, difficulty: &str) -> Result<(), TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    health_timeout: Duration,
}

impl HttpTransport {
    /// Transport for the configured base URL and timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization).
    pub fn new(config: &DecisionConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base_url: config.normalized_base_url().to_string(),
            client,
            health_timeout: config.health_check_timeout(),
        })
    }

    /// Base URL requests go to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn error_for_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DecisionTransport for HttpTransport {
    async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).timeout(self.health_timeout).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::trace!(error = %e, "Health probe failed");
                false
            }
        }
    }

    async fn decide(&self, request: &DecideRequest) -> Result<DecideResponse, TransportError> {
        let url = format!("{}/ai/decide", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::error_for_status(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| TransportError::Malformed(e.to_string()))
    }

    async fn set_difficulty(&self, difficulty: &str) -> Result<(), TransportError> {
        let url = format!("{}/ai/set_difficulty", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SetDifficultyRequest::new(difficulty))
            .send()
            .await?;
        Self::error_for_status(response).await?;
        Ok(())
    }
}

/// Scripted in-memory transport for tests
///
/// Clones share state, so a test can keep one handle while the orchestrator
/// owns another. Decide calls pop scripted responses in order; with nothing
/// scripted they fail.
///
/// # Examples
///
/// ```
/// use mindgames_decision::{DecisionTransport, MockTransport};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let mock = MockTransport::healthy();
/// assert!(mock.health().await);
///
/// mock.set_healthy(false);
/// assert!(!mock.health().await);
/// assert_eq!(mock.health_calls(), 2);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    healthy: Arc<AtomicBool>,
    responses: Arc<Mutex<VecDeque<Result<DecideResponse, TransportError>>>>,
    difficulties: Arc<Mutex<Vec<String>>>,
    health_calls: Arc<AtomicUsize>,
    decide_calls: Arc<AtomicUsize>,
}

impl MockTransport {
    /// Mock that reports healthy
    pub fn healthy() -> Self {
        let mock = Self::default();
        mock.set_healthy(true);
        mock
    }

    /// Mock that reports unhealthy
    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Flip the reported health
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Queue a decide result
    pub fn push_response(&self, response: Result<DecideResponse, TransportError>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Number of health probes so far
    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Number of decide calls so far
    pub fn decide_calls(&self) -> usize {
        self.decide_calls.load(Ordering::SeqCst)
    }

    /// Difficulties set so far, oldest first
    pub fn difficulties(&self) -> Vec<String> {
        self.difficulties
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl DecisionTransport for MockTransport {
    async fn health(&self) -> bool {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.healthy.load(Ordering::SeqCst)
    }

    async fn decide(&self, _request: &DecideRequest) -> Result<DecideResponse, TransportError> {
        self.decide_calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Backend("no scripted response".to_string())))
    }

    async fn set_difficulty(&self, difficulty: &str) -> Result<(), TransportError> {
        self.difficulties
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SetDifficultyRequest::new(difficulty).difficulty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgames_domain::{GameState, Player, PlayerType};

    fn request() -> DecideRequest {
        let state = GameState::new(
            Player::new("A", PlayerType::Human),
            Player::new("B", PlayerType::AiEasy),
        );
        DecideRequest::new(&state, PlayerType::AiEasy)
    }

    #[tokio::test]
    async fn test_mock_scripted_responses() {
        let mock = MockTransport::healthy();
        mock.push_response(Ok(DecideResponse::action("ACCEPT", 0.7)));

        let first = mock.decide(&request()).await.unwrap();
        assert_eq!(first.action.as_deref(), Some("ACCEPT"));
        assert!(mock.decide(&request()).await.is_err());
        assert_eq!(mock.decide_calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_clones_share_state() {
        let mock = MockTransport::unhealthy();
        let handle = mock.clone();
        handle.set_healthy(true);
        assert!(mock.health().await);

        mock.set_difficulty("Hard").await.unwrap();
        assert_eq!(handle.difficulties(), vec!["hard"]);
    }

    #[tokio::test]
    async fn test_http_health_unreachable() {
        let config = DecisionConfig {
            health_check_timeout_ms: 200,
            ..DecisionConfig::attach("http://127.0.0.1:1")
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert!(!transport.health().await);
    }
}
