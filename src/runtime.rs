//! Runtime collaborator traits.
//!
//! The selection layer does not store pods or containers. It consumes a
//! `Runtime`, which owns them, through three capabilities per kind:
//! - list every entity
//! - fetch the most recently created entity
//! - look one up by name, full ID or unique ID prefix
//!
//! `Catalog` is the same capability set for a single kind. The resolver is
//! written once against `Catalog`; `PodCatalog` and `ContainerCatalog` adapt a
//! `Runtime` to it.

use crate::error::Result;
use crate::state::{Container, EntityKind, Pod};
use std::sync::Arc;

// =============================================================================
// Runtime Trait
// =============================================================================

/// A pod and container store that the selection layer reads from.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The selection layer only borrows
/// the runtime immutably; concurrent resolutions against the same runtime
/// are safe as long as the implementation is.
pub trait Runtime: Send + Sync {
    /// Returns the runtime name, logged with every resolution.
    fn name(&self) -> &str;

    // =========================================================================
    // Pods
    // =========================================================================

    /// Lists every pod. Order is implementation-defined.
    fn all_pods(&self) -> Result<Vec<Arc<Pod>>>;

    /// Returns the most recently created pod.
    ///
    /// # Errors
    ///
    /// - `NoLatest` if there are no pods
    fn latest_pod(&self) -> Result<Arc<Pod>>;

    /// Looks up a pod by full ID, name or unique ID prefix.
    ///
    /// # Errors
    ///
    /// - `PodNotFound` if nothing matches
    /// - `AmbiguousId` if a prefix matches several pods
    fn lookup_pod(&self, id: &str) -> Result<Arc<Pod>>;

    // =========================================================================
    // Containers
    // =========================================================================

    /// Lists every container. Order is implementation-defined.
    fn all_containers(&self) -> Result<Vec<Arc<Container>>>;

    /// Returns the most recently created container.
    fn latest_container(&self) -> Result<Arc<Container>>;

    /// Looks up a container by full ID, name or unique ID prefix.
    fn lookup_container(&self, id: &str) -> Result<Arc<Container>>;
}

// =============================================================================
// Catalog
// =============================================================================

/// The capability set the resolver needs for one entity kind.
pub trait Catalog {
    /// Handle type returned to callers.
    type Entity;

    /// Kind of entity this catalog serves.
    fn kind(&self) -> EntityKind;

    /// Name of the backing runtime, for log fields.
    fn source(&self) -> &str;

    /// Lists every entity.
    fn list_all(&self) -> Result<Vec<Self::Entity>>;

    /// Returns the most recently created entity.
    fn get_latest(&self) -> Result<Self::Entity>;

    /// Looks up one entity by identifier.
    fn lookup(&self, id: &str) -> Result<Self::Entity>;
}

/// Pods of a runtime, as a `Catalog`.
pub struct PodCatalog<'r, R: ?Sized> {
    runtime: &'r R,
}

impl<'r, R: Runtime + ?Sized> PodCatalog<'r, R> {
    pub fn new(runtime: &'r R) -> Self {
        Self { runtime }
    }
}

impl<R: Runtime + ?Sized> Catalog for PodCatalog<'_, R> {
    type Entity = Arc<Pod>;

    fn kind(&self) -> EntityKind {
        EntityKind::Pod
    }

    fn source(&self) -> &str {
        self.runtime.name()
    }

    fn list_all(&self) -> Result<Vec<Arc<Pod>>> {
        self.runtime.all_pods()
    }

    fn get_latest(&self) -> Result<Arc<Pod>> {
        self.runtime.latest_pod()
    }

    fn lookup(&self, id: &str) -> Result<Arc<Pod>> {
        self.runtime.lookup_pod(id)
    }
}

/// Containers of a runtime, as a `Catalog`.
pub struct ContainerCatalog<'r, R: ?Sized> {
    runtime: &'r R,
}

impl<'r, R: Runtime + ?Sized> ContainerCatalog<'r, R> {
    pub fn new(runtime: &'r R) -> Self {
        Self { runtime }
    }
}

impl<R: Runtime + ?Sized> Catalog for ContainerCatalog<'_, R> {
    type Entity = Arc<Container>;

    fn kind(&self) -> EntityKind {
        EntityKind::Container
    }

    fn source(&self) -> &str {
        self.runtime.name()
    }

    fn list_all(&self) -> Result<Vec<Arc<Container>>> {
        self.runtime.all_containers()
    }

    fn get_latest(&self) -> Result<Arc<Container>> {
        self.runtime.latest_container()
    }

    fn lookup(&self, id: &str) -> Result<Arc<Container>> {
        self.runtime.lookup_container(id)
    }
}
