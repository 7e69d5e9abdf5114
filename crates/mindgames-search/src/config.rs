//! Native search configuration and library discovery paths

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directories probed for the native library, in order
pub const DEFAULT_SEARCH_DIRS: [&str; 5] = [
    "../rust-optimizer/target/release/",
    "rust-optimizer/target/release/",
    "./lib/",
    "./lib/native/",
    "./",
];

/// Configuration for the native search bridge
///
/// # Examples
///
/// ```
/// use mindgames_search::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.library_name, "strategic_mind_optimizer");
/// assert_eq!(config.default_depth, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Library base name without platform prefix or extension
    pub library_name: String,

    /// Depth used when the caller does not ask for one
    pub default_depth: u8,

    /// Directories probed after the built-in ones
    pub extra_search_dirs: Vec<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            library_name: "strategic_mind_optimizer".to_string(),
            default_depth: 4,
            extra_search_dirs: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Platform file name of the library
    pub fn library_file_name(&self) -> String {
        platform_library_name(&self.library_name)
    }

    /// Every path probed for the library, in order
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        let file_name = self.library_file_name();
        DEFAULT_SEARCH_DIRS
            .iter()
            .map(Path::new)
            .chain(self.extra_search_dirs.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(&file_name))
            .collect()
    }

    /// First candidate path that exists on disk
    pub fn locate_library(&self) -> Option<PathBuf> {
        self.candidate_paths().into_iter().find(|p| p.is_file())
    }
}

/// `name.dll` on Windows, `libname.dylib` on macOS, `libname.so` elsewhere
pub fn platform_library_name(base: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.dll", base)
    } else if cfg!(target_os = "macos") {
        format!("lib{}.dylib", base)
    } else {
        format!("lib{}.so", base)
    }
}
