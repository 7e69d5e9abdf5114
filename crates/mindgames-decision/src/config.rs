//! Configuration for the decision orchestrator
//!
//! Timings are stored in milliseconds so they read naturally in TOML; use the
//! `Duration` accessors in code.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default decision backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Orchestrator configuration
///
/// # Examples
///
/// ```
/// use mindgames_decision::DecisionConfig;
/// use std::time::Duration;
///
/// let config = DecisionConfig::default();
/// assert_eq!(config.base_url, "http://localhost:5000");
/// assert_eq!(config.retry_attempts, 3);
/// assert_eq!(config.request_timeout(), Duration::from_secs(10));
/// assert!(config.launch.is_some());
///
/// // Talk to an already running backend
/// let config = DecisionConfig::attach("http://10.0.0.7:5000");
/// assert!(config.launch.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,

    /// Timeout for one decide request
    /// Default: 10000
    pub request_timeout_ms: u64,

    /// Decide attempts per move before falling back
    /// Default: 3
    pub retry_attempts: u32,

    /// Pause between decide attempts
    /// Default: 1000
    pub retry_delay_ms: u64,

    /// Health poll interval while waiting for a launched backend
    /// Default: 500
    pub startup_poll_interval_ms: u64,

    /// How long a launched backend may take to become healthy
    /// Default: 30000
    pub startup_timeout_ms: u64,

    /// Health monitor period
    /// Default: 10000
    pub health_check_interval_ms: u64,

    /// Timeout for one health probe
    /// Default: 2000
    pub health_check_timeout_ms: u64,

    /// Time the backend process gets to exit after SIGTERM
    /// Default: 5000
    pub shutdown_grace_ms: u64,

    /// How to launch the backend; `None` attaches to a running one
    pub launch: Option<LaunchConfig>,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
            retry_attempts: 3,
            retry_delay_ms: 1_000,
            startup_poll_interval_ms: 500,
            startup_timeout_ms: 30_000,
            health_check_interval_ms: 10_000,
            health_check_timeout_ms: 2_000,
            shutdown_grace_ms: 5_000,
            launch: Some(LaunchConfig::default()),
        }
    }
}

impl DecisionConfig {
    /// Default timings, no process launch
    pub fn attach(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            launch: None,
            ..Self::default()
        }
    }

    /// Base URL with any trailing slash removed
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Get retry delay as Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Get startup poll interval as Duration
    pub fn startup_poll_interval(&self) -> Duration {
        Duration::from_millis(self.startup_poll_interval_ms.max(1))
    }

    /// Get startup timeout as Duration
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    /// Get health check interval as Duration
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms.max(1))
    }

    /// Get health check timeout as Duration
    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }

    /// Get shutdown grace period as Duration
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

/// How the backend process is located and started
///
/// The first executable that answers `probe_args` successfully within
/// `probe_timeout_ms` is run as `<exe> <args…>` inside the first working
/// directory that exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Executables to try, in order
    pub executables: Vec<String>,

    /// Arguments used to check that an executable works
    pub probe_args: Vec<String>,

    /// Timeout for one probe
    pub probe_timeout_ms: u64,

    /// Working directories to try, in order
    pub working_dirs: Vec<PathBuf>,

    /// Arguments that start the backend
    pub args: Vec<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            executables: vec!["python3".to_string(), "python".to_string(), "py".to_string()],
            probe_args: vec!["--version".to_string()],
            probe_timeout_ms: 2_000,
            working_dirs: vec![PathBuf::from("../python-ai"), PathBuf::from("python-ai")],
            args: vec!["-m".to_string(), "src.api_server".to_string()],
        }
    }
}

impl LaunchConfig {
    /// Get probe timeout as Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecisionConfig::default();
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.startup_poll_interval(), Duration::from_millis(500));
        assert_eq!(config.startup_timeout(), Duration::from_secs(30));
        assert_eq!(config.health_check_interval(), Duration::from_secs(10));
        assert_eq!(config.health_check_timeout(), Duration::from_secs(2));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));

        let launch = config.launch.unwrap();
        assert_eq!(launch.executables, vec!["python3", "python", "py"]);
        assert_eq!(launch.args, vec!["-m", "src.api_server"]);
        assert_eq!(launch.probe_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_trailing_slash() {
        let config = DecisionConfig::attach("http://localhost:5000/");
        assert_eq!(config.normalized_base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_zero_intervals_do_not_spin() {
        let config = DecisionConfig {
            health_check_interval_ms: 0,
            startup_poll_interval_ms: 0,
            ..DecisionConfig::default()
        };
        assert!(config.health_check_interval() > Duration::ZERO);
        assert!(config.startup_poll_interval() > Duration::ZERO);
    }
}
