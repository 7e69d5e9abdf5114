//! Native search module over its C ABI
//!
//! The module exports:
//!
//! ```text
//! int32_t initialize_optimizer(void);
//! const char *get_version(void);
//! double evaluate_state(const char *state_json, uint8_t player_id);
//! char *search_optimal_move(const char *state_json, uint8_t max_depth, uint8_t player_id);
//! void free_result_string(char *result);
//! ```
//!
//! Strings returned by `search_optimal_move` are owned by the module and must
//! go back through `free_result_string`.

use crate::protocol::{NativeGameState, NativeSearchResult};
use crate::{clamp_evaluation, MoveHint, SearchBackend, SearchError, SearchResult};
use libloading::{Library, Symbol};
use mindgames_domain::{GameState, PlayerId, PlayerSlot};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

type InitializeFn = unsafe extern "C" fn() -> i32;
type VersionFn = unsafe extern "C" fn() -> *const c_char;
type EvaluateFn = unsafe extern "C" fn(*const c_char, u8) -> f64;
type SearchFn = unsafe extern "C" fn(*const c_char, u8, u8) -> *mut c_char;
type FreeFn = unsafe extern "C" fn(*mut c_char);

/// Search backed by the dynamically loaded native module
pub struct NativeSearch {
    evaluate_fn: EvaluateFn,
    search_fn: SearchFn,
    free_fn: FreeFn,
    version: String,
    path: PathBuf,
    // Serializes calls into the module; it makes no thread-safety promises.
    call_lock: Mutex<()>,
    // Declared last so the function pointers above never outlive it.
    _library: Library,
}

impl NativeSearch {
    /// Load the module at `path`, resolve its symbols and run a self-test
    ///
    /// The self-test requires `initialize_optimizer` to return 0, a readable
    /// version string, and a finite evaluation of a neutral state.
    ///
    /// # Errors
    ///
    /// [`SearchError::Load`] when the library or a symbol cannot be loaded,
    /// [`SearchError::SelfTest`] when the module misbehaves.
    pub fn load(path: &Path) -> Result<Self, SearchError> {
        // SAFETY: loading runs the library's initializers. The path came from a
        // configured discovery directory and is trusted like any other binary.
        let library = unsafe { Library::new(path)? };

        // SAFETY: symbol types match the module's exported C signatures.
        let (initialize_fn, version_fn, evaluate_fn, search_fn, free_fn) = unsafe {
            let initialize: Symbol<InitializeFn> = library.get(b"initialize_optimizer\0")?;
            let version: Symbol<VersionFn> = library.get(b"get_version\0")?;
            let evaluate: Symbol<EvaluateFn> = library.get(b"evaluate_state\0")?;
            let search: Symbol<SearchFn> = library.get(b"search_optimal_move\0")?;
            let free: Symbol<FreeFn> = library.get(b"free_result_string\0")?;
            (*initialize, *version, *evaluate, *search, *free)
        };

        // SAFETY: no arguments; the module owns its initialization state.
        let code = unsafe { initialize_fn() };
        if code != 0 {
            return Err(SearchError::SelfTest(format!(
                "initialize_optimizer returned {}",
                code
            )));
        }

        // SAFETY: the module returns a pointer to a static NUL-terminated string.
        let version = unsafe {
            let ptr = version_fn();
            if ptr.is_null() {
                return Err(SearchError::SelfTest("get_version returned null".to_string()));
            }
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        };

        let native = Self {
            evaluate_fn,
            search_fn,
            free_fn,
            version,
            path: path.to_path_buf(),
            call_lock: Mutex::new(()),
            _library: library,
        };

        let probe = native.evaluate_json(&NativeGameState::neutral(), 1)?;
        debug!(path = %path.display(), evaluation = probe, "Native self-test passed");

        Ok(native)
    }

    /// Version string reported by the module
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Path the module was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(state: &NativeGameState) -> Result<CString, SearchError> {
        let json = serde_json::to_string(state).map_err(|e| SearchError::Encode(e.to_string()))?;
        CString::new(json).map_err(|e| SearchError::Encode(e.to_string()))
    }

    fn evaluate_json(&self, state: &NativeGameState, player_id: u8) -> Result<f64, SearchError> {
        let input = Self::encode(state)?;
        let _guard = self.call_lock.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: `input` is a valid NUL-terminated string for the whole call.
        let value = unsafe { (self.evaluate_fn)(input.as_ptr(), player_id) };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SearchError::InvalidResult(format!("non-finite evaluation {}", value)))
        }
    }

    fn search_json(
        &self,
        state: &NativeGameState,
        depth: u8,
        player_id: u8,
    ) -> Result<NativeSearchResult, SearchError> {
        let input = Self::encode(state)?;
        let _guard = self.call_lock.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: `input` outlives the call; a non-null result is a module-owned
        // string that is copied out and then handed back to the module.
        let raw = unsafe {
            let ptr = (self.search_fn)(input.as_ptr(), depth, player_id);
            if ptr.is_null() {
                return Err(SearchError::NullResult);
            }
            let text = CStr::from_ptr(ptr).to_string_lossy().into_owned();
            (self.free_fn)(ptr);
            text
        };

        serde_json::from_str(&raw).map_err(|e| SearchError::InvalidResult(e.to_string()))
    }
}

impl std::fmt::Debug for NativeSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeSearch")
            .field("version", &self.version)
            .field("path", &self.path)
            .finish()
    }
}

fn player_number(state: &GameState, player: PlayerId) -> u8 {
    state
        .slot_of(player)
        .unwrap_or(PlayerSlot::Player2)
        .number()
}

impl SearchBackend for NativeSearch {
    fn name(&self) -> &str {
        "native"
    }

    fn evaluate(&self, state: &GameState, player: PlayerId) -> Result<f64, SearchError> {
        self.evaluate_json(&NativeGameState::from(state), player_number(state, player))
            .map(clamp_evaluation)
    }

    fn search(
        &self,
        state: &GameState,
        player: PlayerId,
        depth: u8,
    ) -> Result<SearchResult, SearchError> {
        let result = self.search_json(
            &NativeGameState::from(state),
            depth,
            player_number(state, player),
        )?;

        if !result.evaluation.is_finite() {
            return Err(SearchError::InvalidResult(format!(
                "non-finite evaluation {}",
                result.evaluation
            )));
        }

        Ok(SearchResult {
            evaluation: clamp_evaluation(result.evaluation),
            nodes_explored: result.nodes_explored,
            depth_reached: result.depth_reached,
            elapsed_ms: result.time_ms,
            best_move: result.best_move.map(|m| MoveHint {
                action: m.action,
                confidence: m.confidence,
            }),
        })
    }
}
