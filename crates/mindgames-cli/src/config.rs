//! Configuration management for the CLI.
//!
//! Every component owns its own config section; this module only aggregates
//! them and decides which file to read.

use crate::error::ConfigError;
use mindgames_decision::DecisionConfig;
use mindgames_engine::RulesConfig;
use mindgames_heuristics::HeuristicPolicy;
use mindgames_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application configuration, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Front end settings
    pub settings: Settings,

    /// Game rules
    pub rules: RulesConfig,

    /// Fallback AI tuning
    pub heuristics: HeuristicPolicy,

    /// Decision server connection
    pub decision: DecisionConfig,

    /// Native search library
    pub search: SearchConfig,
}

/// Front end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Start the decision server as a child process; otherwise attach to
    /// `decision.base_url`
    pub launch_backend: bool,

    /// Pause between AI moves in AI-vs-AI games
    pub ai_move_delay_ms: u64,

    /// Command history size
    pub history_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            launch_backend: true,
            ai_move_delay_ms: 500,
            history_size: 1000,
        }
    }
}

impl AppConfig {
    /// Directory holding the config file and REPL history.
    pub fn dir() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".mindgames"))
    }

    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration text; missing sections keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = toml::from_str(contents)?;
        config.normalize();
        Ok(config)
    }

    /// Load from `explicit` if given, else the default file if present, else defaults.
    ///
    /// An explicit path must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "Loading configuration");
            return Self::from_file(path);
        }

        match Self::default_path() {
            Ok(path) if path.exists() => {
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Point the decision bridge at an already running server.
    pub fn attach_to(&mut self, url: impl Into<String>) {
        self.decision.base_url = url.into();
        self.settings.launch_backend = false;
        self.normalize();
    }

    fn normalize(&mut self) {
        if !self.settings.launch_backend {
            self.decision.launch = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgames_engine::TurnOrder;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.settings.color);
        assert!(config.settings.launch_backend);
        assert!(config.decision.launch.is_some());
        assert_eq!(config.rules.turn_order, TurnOrder::Round);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [rules]
            turn_order = "responder"
            seed = 7

            [decision]
            retry_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.rules.turn_order, TurnOrder::Responder);
        assert_eq!(config.rules.seed, Some(7));
        assert_eq!(config.decision.retry_attempts, 5);
        assert_eq!(config.decision.request_timeout_ms, 10_000);
        assert_eq!(config.heuristics, HeuristicPolicy::default());
    }

    #[test]
    fn test_no_launch() {
        let config = AppConfig::from_toml("[settings]\nlaunch_backend = false\n").unwrap();
        assert!(config.decision.launch.is_none());
    }

    #[test]
    fn test_attach_to() {
        let mut config = AppConfig::default();
        config.attach_to("http://10.1.1.1:5000");
        assert_eq!(config.decision.base_url, "http://10.1.1.1:5000");
        assert!(config.decision.launch.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml("[rules]\nturn_order = \"sideways\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
