//! Bridge startup and the initialization summary.

use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use mindgames_decision::{DecisionOrchestrator, DecisionTransport, HttpTransport};
use mindgames_search::SearchBridge;
use tracing::{info, warn};

/// Which AI components came up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitSummary {
    /// The decision server answered its last health check
    pub ai_server_online: bool,
    /// Native optimizer version, when the library loaded
    pub native_optimizer: Option<String>,
}

impl InitSummary {
    /// Snapshot the state of both bridges.
    pub fn collect<T: DecisionTransport>(
        orchestrator: &DecisionOrchestrator<T>,
        search: &SearchBridge,
    ) -> Self {
        Self {
            ai_server_online: orchestrator.is_healthy(),
            native_optimizer: search
                .is_native()
                .then(|| search.version().unwrap_or("unknown").to_string()),
        }
    }

    /// "Full AI" when both bridges are up, "Basic" otherwise.
    pub fn game_mode(&self) -> &'static str {
        if self.ai_server_online && self.native_optimizer.is_some() {
            "Full AI"
        } else {
            "Basic"
        }
    }

    /// Multi-line summary block.
    pub fn render(&self, formatter: &Formatter) -> String {
        let server = if self.ai_server_online {
            formatter.success("Online")
        } else {
            formatter.error("Offline (using fallback AI)")
        };
        let optimizer = match &self.native_optimizer {
            Some(version) => formatter.success(&format!("Available ({})", version)),
            None => formatter.error("Not available (using heuristic search)"),
        };

        [
            "=== Initialization Summary ===".to_string(),
            format!("AI Server:       {}", server),
            format!("Native Optimizer: {}", optimizer),
            format!("Game Mode:       {}", self.game_mode()),
            "==============================".to_string(),
        ]
        .join("\n")
    }
}

/// Build the decision orchestrator and try to bring its backend up.
///
/// A failed start is reported as a warning; the orchestrator then stays
/// uninitialized and the game uses the fallback AI.
pub async fn start_orchestrator(
    config: &AppConfig,
    formatter: &Formatter,
) -> Result<DecisionOrchestrator<HttpTransport>> {
    let mut orchestrator =
        DecisionOrchestrator::new(config.decision.clone(), config.heuristics.clone())?;

    match orchestrator.initialize().await {
        Ok(()) => info!(base_url = %config.decision.base_url, "Decision orchestrator ready"),
        Err(e) => {
            warn!(error = %e, "Decision orchestrator failed to start");
            eprintln!(
                "{}",
                formatter.warning(&format!(
                    "AI server unavailable ({}). The game will use the fallback AI.",
                    e
                ))
            );
        }
    }

    Ok(orchestrator)
}

/// Look for the native optimizer.
pub fn start_search(config: &AppConfig) -> SearchBridge {
    SearchBridge::discover(&config.search, config.heuristics.clone())
}
