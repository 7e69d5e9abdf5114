//! Backend selection and per-call degradation

use crate::config::SearchConfig;
use crate::heuristic::HeuristicSearch;
use crate::native::NativeSearch;
use crate::{SearchBackend, SearchError, SearchResult};
use mindgames_domain::{GameState, PlayerId};
use mindgames_heuristics::HeuristicPolicy;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Evaluation and search front door
///
/// Discovery runs once in [`SearchBridge::discover`]. If the native module is
/// loaded, each call still falls back to the heuristic when that particular
/// native call fails; discovery is never retried.
pub struct SearchBridge {
    native: Option<NativeSearch>,
    heuristic: HeuristicSearch,
    default_depth: u8,
}

impl SearchBridge {
    /// Probe for the native module and pick a backend
    pub fn discover(config: &SearchConfig, policy: HeuristicPolicy) -> Self {
        let native = match Self::load_native(config) {
            Ok(native) => {
                info!(
                    path = %native.path().display(),
                    version = native.version(),
                    "Native search module loaded"
                );
                Some(native)
            }
            Err(e) => {
                warn!(error = %e, "Native search unavailable, using heuristic evaluation");
                None
            }
        };

        Self {
            native,
            heuristic: HeuristicSearch::new(policy),
            default_depth: config.default_depth,
        }
    }

    /// A bridge that never looks for the native module
    pub fn heuristic_only(config: &SearchConfig, policy: HeuristicPolicy) -> Self {
        Self {
            native: None,
            heuristic: HeuristicSearch::new(policy),
            default_depth: config.default_depth,
        }
    }

    fn load_native(config: &SearchConfig) -> Result<NativeSearch, SearchError> {
        let path = config.locate_library().ok_or_else(|| {
            SearchError::LibraryNotFound(config.library_file_name())
        })?;
        debug!(path = %path.display(), "Found native search library");
        NativeSearch::load(&path)
    }

    /// True iff the native module is in use
    pub fn is_native(&self) -> bool {
        self.native.is_some()
    }

    /// Path of the loaded module
    pub fn library_path(&self) -> Option<PathBuf> {
        self.native.as_ref().map(|n| n.path().to_path_buf())
    }

    /// Version reported by the loaded module
    pub fn version(&self) -> Option<&str> {
        self.native.as_ref().map(NativeSearch::version)
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &str {
        match &self.native {
            Some(native) => native.name(),
            None => self.heuristic.name(),
        }
    }

    /// Configured default search depth
    pub fn default_depth(&self) -> u8 {
        self.default_depth
    }

    /// Evaluate from the perspective of `player`, finite and within ±1000
    pub fn evaluate_position(&self, state: &GameState, player: PlayerId) -> f64 {
        if let Some(native) = &self.native {
            match native.evaluate(state, player) {
                Ok(value) => return value,
                Err(e) => warn!(error = %e, "Native evaluation failed, using heuristic"),
            }
        }
        self.heuristic.score(state, player)
    }

    /// Search for the best move for `player` down to `depth`
    pub fn search_best_move(&self, state: &GameState, player: PlayerId, depth: u8) -> SearchResult {
        if let Some(native) = &self.native {
            match native.search(state, player, depth) {
                Ok(result) => return result,
                Err(e) => warn!(error = %e, depth, "Native search failed, using heuristic"),
            }
        }
        self.heuristic.run(state, player, depth)
    }

    /// [`SearchBridge::search_best_move`] at the configured depth
    pub fn search_default(&self, state: &GameState, player: PlayerId) -> SearchResult {
        self.search_best_move(state, player, self.default_depth)
    }
}

impl std::fmt::Debug for SearchBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBridge")
            .field("backend", &self.backend_name())
            .field("library_path", &self.library_path())
            .field("default_depth", &self.default_depth)
            .finish()
    }
}
