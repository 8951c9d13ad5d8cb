//! In-process runtime.
//!
//! Holds pods and containers as `Arc` handles in insertion order. Useful for
//! embedding and for exercising the resolver without a state root.

use super::{find_by_identifier, pick_latest};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::state::{Container, Entity, Pod};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Runtime backed by in-memory vectors.
///
/// `all_pods`/`all_containers` return insertion order. Re-inserting an entity
/// with an existing ID replaces it in place.
pub struct MemoryRuntime {
    name: String,
    pods: RwLock<Vec<Arc<Pod>>>,
    containers: RwLock<Vec<Arc<Container>>>,
}

impl MemoryRuntime {
    /// Creates an empty runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("memory")
    }

    /// Creates an empty runtime with a custom name.
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pods: RwLock::new(Vec::new()),
            containers: RwLock::new(Vec::new()),
        }
    }

    /// Adds or replaces a pod and returns the shared handle.
    pub fn insert_pod(&self, pod: Pod) -> Result<Arc<Pod>> {
        let mut pods = self.pods.write().map_err(|_| poisoned())?;
        Ok(upsert(&mut *pods, pod))
    }

    /// Adds or replaces a container and returns the shared handle.
    pub fn insert_container(&self, container: Container) -> Result<Arc<Container>> {
        let mut containers = self.containers.write().map_err(|_| poisoned())?;
        Ok(upsert(&mut *containers, container))
    }

    /// Removes the pod with this full ID.
    pub fn remove_pod(&self, id: &str) -> Result<Option<Arc<Pod>>> {
        let mut pods = self.pods.write().map_err(|_| poisoned())?;
        Ok(remove(&mut *pods, id))
    }

    /// Removes the container with this full ID.
    pub fn remove_container(&self, id: &str) -> Result<Option<Arc<Container>>> {
        let mut containers = self.containers.write().map_err(|_| poisoned())?;
        Ok(remove(&mut *containers, id))
    }
}

impl Default for MemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> Error {
    Error::Backend("runtime lock poisoned".to_string())
}

fn upsert<T: Entity>(items: &mut Vec<Arc<T>>, entity: T) -> Arc<T> {
    let entity = Arc::new(entity);
    match items.iter_mut().find(|e| e.id() == entity.id()) {
        Some(slot) => {
            debug!(kind = %T::KIND, id = %entity.id(), "replacing entity");
            *slot = Arc::clone(&entity);
        }
        None => items.push(Arc::clone(&entity)),
    }
    entity
}

fn remove<T: Entity>(items: &mut Vec<Arc<T>>, id: &str) -> Option<Arc<T>> {
    let pos = items.iter().position(|e| e.id() == id)?;
    Some(items.remove(pos))
}

impl Runtime for MemoryRuntime {
    fn name(&self) -> &str {
        &self.name
    }

    fn all_pods(&self) -> Result<Vec<Arc<Pod>>> {
        Ok(self.pods.read().map_err(|_| poisoned())?.clone())
    }

    fn latest_pod(&self) -> Result<Arc<Pod>> {
        let pods = self.pods.read().map_err(|_| poisoned())?;
        pick_latest(pods.as_slice())
    }

    fn lookup_pod(&self, id: &str) -> Result<Arc<Pod>> {
        let pods = self.pods.read().map_err(|_| poisoned())?;
        find_by_identifier(pods.as_slice(), id)
    }

    fn all_containers(&self) -> Result<Vec<Arc<Container>>> {
        Ok(self.containers.read().map_err(|_| poisoned())?.clone())
    }

    fn latest_container(&self) -> Result<Arc<Container>> {
        let containers = self.containers.read().map_err(|_| poisoned())?;
        pick_latest(containers.as_slice())
    }

    fn lookup_container(&self, id: &str) -> Result<Arc<Container>> {
        let containers = self.containers.read().map_err(|_| poisoned())?;
        find_by_identifier(containers.as_slice(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_same_id() {
        let rt = MemoryRuntime::new();
        rt.insert_pod(Pod::new("web")).unwrap();
        rt.insert_pod(Pod::new("db")).unwrap();
        rt.insert_pod(Pod::new("web").with_status(crate::state::PodStatus::Running))
            .unwrap();

        let pods = rt.all_pods().unwrap();
        assert_eq!(pods.len(), 2);
        assert_eq!(pods[0].name, "web");
        assert_eq!(pods[0].status, crate::state::PodStatus::Running);
    }

    #[test]
    fn test_remove() {
        let rt = MemoryRuntime::new();
        let c = rt.insert_container(Container::new("app", "alpine")).unwrap();
        assert!(rt.remove_container(&c.id).unwrap().is_some());
        assert!(rt.remove_container(&c.id).unwrap().is_none());
        assert!(rt.lookup_container("app").unwrap_err().is_not_found());
    }

    #[test]
    fn test_handles_are_shared() {
        let rt = MemoryRuntime::new();
        let inserted = rt.insert_pod(Pod::new("web")).unwrap();
        let found = rt.lookup_pod("web").unwrap();
        assert!(Arc::ptr_eq(&inserted, &found));
    }
}
