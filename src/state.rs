//! Entity types handed out by a runtime.
//!
//! - `EntityKind`: pod or container, used in errors and log fields
//! - `Pod` / `PodStatus`: pod record
//! - `Container` / `ContainerStatus`: container record
//!
//! Records are owned by the runtime and shared as `Arc` handles; the
//! selection layer never constructs or mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Entity Kind
// =============================================================================

/// The two kinds of entity a selection can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Pod,
    Container,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pod => write!(f, "pod"),
            Self::Container => write!(f, "container"),
        }
    }
}

// =============================================================================
// IDs
// =============================================================================

/// Derives a full entity ID from kind, namespace and name.
///
/// SHA-256 of `kind/namespace/name` as 64 lowercase hex characters. The same
/// inputs always produce the same ID, so re-creating an entity keeps its ID.
#[must_use]
pub fn derive_id(kind: EntityKind, namespace: &str, name: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write;

    let mut hasher = Sha256::new();
    hasher.update(kind.to_string().as_bytes());
    hasher.update(b"/");
    hasher.update(namespace.as_bytes());
    hasher.update(b"/");
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();

    let mut id = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(id, "{byte:02x}");
    }
    id
}

/// Returns the 12-character short form of an ID.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

// =============================================================================
// Pod
// =============================================================================

/// Pod lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodStatus {
    #[default]
    Created,
    Running,
    Paused,
    Exited,
    Degraded,
}

impl std::fmt::Display for PodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Exited => write!(f, "exited"),
            Self::Degraded => write!(f, "degraded"),
        }
    }
}

/// A pod as recorded by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    /// Full 64-character ID.
    pub id: String,
    /// Pod name, unique within the runtime.
    pub name: String,
    /// Namespace the pod belongs to.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Current status.
    #[serde(default)]
    pub status: PodStatus,
    /// Creation time, used to pick the latest pod.
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Pod {
    /// Creates a pod in the default namespace, created now.
    pub fn new(name: impl Into<String>) -> Self {
        Self::in_namespace("default", name)
    }

    /// Creates a pod in `namespace`, created now.
    pub fn in_namespace(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        Self {
            id: derive_id(EntityKind::Pod, &namespace, &name),
            name,
            namespace,
            status: PodStatus::default(),
            created_at: Utc::now(),
            labels: HashMap::new(),
        }
    }

    /// Overrides the derived ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Overrides the creation time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: PodStatus) -> Self {
        self.status = status;
        self
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

// =============================================================================
// Container
// =============================================================================

/// Container lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    #[default]
    Created,
    Running,
    Paused,
    Stopped,
    Exited,
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
            Self::Exited => write!(f, "exited"),
        }
    }
}

/// A container as recorded by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Full 64-character ID.
    pub id: String,
    /// Container name, unique within the runtime.
    pub name: String,
    /// Owning pod, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_id: Option<String>,
    /// Image reference the container was created from.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub status: ContainerStatus,
    /// Creation time, used to pick the latest container.
    pub created_at: DateTime<Utc>,
}

impl Container {
    /// Creates a standalone container, created now.
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: derive_id(EntityKind::Container, "default", &name),
            name,
            pod_id: None,
            image: image.into(),
            status: ContainerStatus::default(),
            created_at: Utc::now(),
        }
    }

    /// Overrides the derived ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Overrides the creation time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ContainerStatus) -> Self {
        self.status = status;
        self
    }

    /// Attaches the container to a pod.
    #[must_use]
    pub fn in_pod(mut self, pod_id: impl Into<String>) -> Self {
        self.pod_id = Some(pod_id.into());
        self
    }
}

// =============================================================================
// Common accessors
// =============================================================================

/// Fields every entity exposes, used by the stores for id matching.
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Entity for Pod {
    const KIND: EntityKind = EntityKind::Pod;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Container {
    const KIND: EntityKind = EntityKind::Container;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
