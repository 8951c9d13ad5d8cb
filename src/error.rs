//! Error types for the selection layer.

use crate::state::EntityKind;
use std::path::PathBuf;

/// Result type alias for selection and lookup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving pods and containers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// No pod matches the identifier.
    #[error("no such pod: {0}")]
    PodNotFound(String),

    /// No container matches the identifier.
    #[error("no such container: {0}")]
    ContainerNotFound(String),

    /// Identifier is a prefix of more than one ID.
    #[error("more than one {kind} matches '{id}': {}", .matches.join(", "))]
    AmbiguousId {
        kind: EntityKind,
        id: String,
        matches: Vec<String>,
    },

    /// Identifier cannot name any entity.
    #[error("invalid {kind} identifier '{id}': {reason}")]
    InvalidId {
        kind: EntityKind,
        id: String,
        reason: String,
    },

    /// "Latest" was requested but the runtime holds nothing of that kind.
    #[error("no {0}s to select the latest from")]
    NoLatest(EntityKind),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// A persisted state file could not be read or parsed.
    #[error("failed to read state at {path}: {reason}")]
    StateReadFailed { path: PathBuf, reason: String },

    /// Runtime backend failure not covered by another variant.
    #[error("runtime backend error: {0}")]
    Backend(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration value cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Returns the not-found error for `kind`.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        match kind {
            EntityKind::Pod => Self::PodNotFound(id.into()),
            EntityKind::Container => Self::ContainerNotFound(id.into()),
        }
    }

    /// Returns true if the error means "nothing by that name", as opposed
    /// to a backend failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PodNotFound(_) | Self::ContainerNotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_per_kind() {
        assert!(matches!(
            Error::not_found(EntityKind::Pod, "web"),
            Error::PodNotFound(id) if id == "web"
        ));
        assert!(matches!(
            Error::not_found(EntityKind::Container, "db"),
            Error::ContainerNotFound(id) if id == "db"
        ));
    }

    #[test]
    fn test_ambiguous_lists_candidates() {
        let err = Error::AmbiguousId {
            kind: EntityKind::Container,
            id: "ab".to_string(),
            matches: vec!["abc1".to_string(), "abd2".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("container"));
        assert!(msg.contains("abc1, abd2"));
        assert!(!err.is_not_found());
    }
}
