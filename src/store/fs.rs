//! State-root runtime.
//!
//! Reads pod and container records persisted as JSON:
//!
//! ```text
//!   <root>/pods/<id>/state.json
//!   <root>/containers/<id>/state.json
//! ```
//!
//! A missing kind directory means the runtime holds nothing of that kind.
//! Entity directories without a state file are treated as still being
//! created and skipped. A state file that cannot be read or parsed fails
//! listing, since a listing must not silently drop entities. Lookups skip
//! it instead and fail only identifiers that point at it.

use super::{find_by_identifier, is_full_id, pick_latest, validate_identifier};
use crate::constants::{CONTAINERS_DIR, PODS_DIR, STATE_FILE};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::state::{Container, Entity, EntityKind, Pod};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runtime reading entity state from a directory tree.
///
/// Every call reads the disk afresh; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct StateDirRuntime {
    root: PathBuf,
}

impl StateDirRuntime {
    /// Opens a state root. The directory does not have to exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the state root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persists a pod record under the state root.
    pub fn save_pod(&self, pod: &Pod) -> Result<PathBuf> {
        self.save(pod)
    }

    /// Persists a container record under the state root.
    pub fn save_container(&self, container: &Container) -> Result<PathBuf> {
        self.save(container)
    }

    fn kind_dir(&self, kind: EntityKind) -> PathBuf {
        match kind {
            EntityKind::Pod => self.root.join(PODS_DIR),
            EntityKind::Container => self.root.join(CONTAINERS_DIR),
        }
    }

    fn save<T: Entity + Serialize>(&self, entity: &T) -> Result<PathBuf> {
        if !is_full_id(entity.id()) {
            return Err(Error::InvalidId {
                kind: T::KIND,
                id: entity.id().to_string(),
                reason: "state can only be saved under a full lowercase hex ID".to_string(),
            });
        }

        let dir = self.kind_dir(T::KIND).join(entity.id());
        create_private_dir(&dir)?;

        let path = dir.join(STATE_FILE);
        let content = serde_json::to_string_pretty(entity)?;
        std::fs::write(&path, content)?;

        info!(kind = %T::KIND, id = %entity.id(), path = %path.display(), "saved state");
        Ok(path)
    }

    /// Reads every entity directory of `T::KIND`, keyed by directory name.
    fn read_entries<T: Entity + DeserializeOwned>(&self) -> Result<Vec<(String, Result<T>)>> {
        let dir = self.kind_dir(T::KIND);
        if !dir.exists() {
            debug!(kind = %T::KIND, dir = %dir.display(), "no state directory");
            return Ok(Vec::new());
        }

        let mut entries = std::fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        let mut states = Vec::with_capacity(entries.len());
        for entity_dir in entries.into_iter().filter(|p| p.is_dir()) {
            let path = entity_dir.join(STATE_FILE);
            if !path.exists() {
                debug!(
                    kind = %T::KIND,
                    dir = %entity_dir.display(),
                    "skipping entry without state"
                );
                continue;
            }
            let entry_id = entity_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            states.push((entry_id, read_state::<T>(&path)));
        }
        Ok(states)
    }

    fn load_all<T: Entity + DeserializeOwned>(&self) -> Result<Vec<Arc<T>>> {
        self.read_entries::<T>()?
            .into_iter()
            .map(|(_, state)| state.map(Arc::new))
            .collect()
    }

    fn lookup<T: Entity + DeserializeOwned>(&self, id: &str) -> Result<Arc<T>> {
        validate_identifier::<T>(id)?;

        // Full IDs map straight to a directory; skip reading the rest.
        if is_full_id(id) {
            let path = self.kind_dir(T::KIND).join(id).join(STATE_FILE);
            if path.exists() {
                return read_state::<T>(&path).map(Arc::new);
            }
        }

        let mut items = Vec::new();
        let mut unreadable = Vec::new();
        for (entry_id, state) in self.read_entries::<T>()? {
            match state {
                Ok(entity) => items.push(Arc::new(entity)),
                Err(error) => {
                    warn!(kind = %T::KIND, error = %error, "skipping unreadable state");
                    if entry_id.starts_with(id) {
                        unreadable.push((entry_id, error));
                    }
                }
            }
        }

        if unreadable.is_empty() {
            return find_by_identifier(&items, id);
        }

        let exact = items
            .iter()
            .find(|e| e.id() == id)
            .or_else(|| items.iter().find(|e| e.name() == id));
        if let Some(found) = exact {
            return Ok(Arc::clone(found));
        }

        let mut matches: Vec<String> = items
            .iter()
            .filter(|e| e.id().starts_with(id))
            .map(|e| e.id().to_string())
            .collect();
        if matches.is_empty() && unreadable.len() == 1 {
            let (_, error) = unreadable.remove(0);
            return Err(error);
        }

        matches.extend(unreadable.into_iter().map(|(entry_id, _)| entry_id));
        Err(Error::AmbiguousId {
            kind: T::KIND,
            id: id.to_string(),
            matches,
        })
    }
}

fn read_state<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::StateReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| Error::StateReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn create_private_dir(dir: &Path) -> Result<()> {
    // State may name images and pods; keep it readable by the owner only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)?;
    }
    #[cfg(not(unix))]
    {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

impl Runtime for StateDirRuntime {
    fn name(&self) -> &str {
        "state-dir"
    }

    fn all_pods(&self) -> Result<Vec<Arc<Pod>>> {
        self.load_all()
    }

    fn latest_pod(&self) -> Result<Arc<Pod>> {
        pick_latest(&self.load_all::<Pod>()?)
    }

    fn lookup_pod(&self, id: &str) -> Result<Arc<Pod>> {
        self.lookup(id)
    }

    fn all_containers(&self) -> Result<Vec<Arc<Container>>> {
        self.load_all()
    }

    fn latest_container(&self) -> Result<Arc<Container>> {
        pick_latest(&self.load_all::<Container>()?)
    }

    fn lookup_container(&self, id: &str) -> Result<Arc<Container>> {
        self.lookup(id)
    }
}
