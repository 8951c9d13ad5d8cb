//! Configuration for tools built on the selection layer.
//!
//! Values are taken from, in order: explicit settings (CLI flags), the
//! environment, platform defaults.

use crate::constants::{
    DEFAULT_LOG_LEVEL, ENV_LOG_LEVEL, ENV_STATE_ROOT, HOME_STATE_DIR, LOCAL_DATA_STATE_DIR,
    RUN_DIR, SYSTEM_STATE_ROOT,
};
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Returns the state root used when neither flag nor environment sets one.
///
/// Linux keeps state on the `/run` tmpfs. macOS and Windows have no
/// root-owned equivalent, so state lives under the user's home or local data
/// directory.
pub fn default_state_root() -> PathBuf {
    if cfg!(target_os = "macos") {
        per_user_root(dirs::home_dir(), HOME_STATE_DIR)
    } else if cfg!(target_os = "windows") {
        per_user_root(dirs::data_local_dir(), LOCAL_DATA_STATE_DIR)
    } else {
        PathBuf::from(SYSTEM_STATE_ROOT)
    }
}

/// `<base>/<dir>/run`, relative to the working directory without a base.
fn per_user_root(base: Option<PathBuf>, dir: &str) -> PathBuf {
    base.unwrap_or_default().join(dir).join(RUN_DIR)
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding pod and container state.
    pub state_root: PathBuf,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_root: default_state_root(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Builds a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            state_root: var(ENV_STATE_ROOT)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_root),
            log_level: var(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        }
    }

    /// Overrides the state root if `root` is set.
    #[must_use]
    pub fn with_state_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.state_root = root;
        }
        self
    }

    /// Overrides the log level if `level` is set.
    #[must_use]
    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.log_level = level;
        }
        self
    }

    /// Parses the configured log level.
    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("unknown log level '{}'", self.log_level)))
    }
}
