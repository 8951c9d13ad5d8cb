//! # Selection Constants
//!
//! Identifier bounds, state-root layout and environment variable names.
//! Anything that reads or writes a state root goes through these names so
//! the library and the CLI agree on the on-disk layout.

// =============================================================================
// Identifier Limits
// =============================================================================

/// Length of a full entity ID (SHA-256, lowercase hex).
pub const FULL_ID_LEN: usize = 64;

/// Maximum identifier length accepted by lookups.
///
/// Names share the bound with IDs; anything longer cannot match either.
pub const MAX_IDENTIFIER_LEN: usize = FULL_ID_LEN;

// =============================================================================
// State Root Layout
// =============================================================================
//
//   <root>/pods/<id>/state.json
//   <root>/containers/<id>/state.json
// =============================================================================

/// Subdirectory holding pod state.
pub const PODS_DIR: &str = "pods";

/// Subdirectory holding container state.
pub const CONTAINERS_DIR: &str = "containers";

/// File name of a persisted entity state.
pub const STATE_FILE: &str = "state.json";

/// State root on Linux and other systems with a `/run` tmpfs.
pub const SYSTEM_STATE_ROOT: &str = "/run/magiksel";

/// Per-user state directory under `$HOME` (macOS).
pub const HOME_STATE_DIR: &str = ".magiksel";

/// Per-user state directory under `%LOCALAPPDATA%` (Windows).
pub const LOCAL_DATA_STATE_DIR: &str = "magiksel";

/// Leaf directory of a per-user state root.
pub const RUN_DIR: &str = "run";

// =============================================================================
// Environment
// =============================================================================

/// Overrides the platform default state root.
pub const ENV_STATE_ROOT: &str = "MAGIKSEL_STATE_ROOT";

/// Overrides the default log level.
pub const ENV_LOG_LEVEL: &str = "MAGIKSEL_LOG";

/// Log level used when neither flag nor environment sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
