//! Runtime implementations.
//!
//! - `MemoryRuntime`: in-process store, insertion-ordered
//! - `StateDirRuntime`: read view over a state root on disk
//!
//! Both resolve identifiers the same way:
//!
//! ```text
//!   "web"          exact ID? ──no──▶ exact name? ──no──▶ unique ID prefix?
//!                     │                 │                    │
//!                    yes               yes           one ─▶ match
//!                     ▼                 ▼            many ─▶ AmbiguousId
//!                   match             match          none ─▶ NotFound
//! ```

mod fs;
mod memory;

pub use fs::StateDirRuntime;
pub use memory::MemoryRuntime;

use crate::constants::{FULL_ID_LEN, MAX_IDENTIFIER_LEN};
use crate::error::{Error, Result};
use crate::state::Entity;
use std::sync::Arc;

/// Rejects identifiers that cannot match anything.
pub(crate) fn validate_identifier<T: Entity>(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidId {
            kind: T::KIND,
            id: id.to_string(),
            reason: "identifier cannot be empty".to_string(),
        });
    }

    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(Error::InvalidId {
            kind: T::KIND,
            id: id.to_string(),
            reason: format!("exceeds maximum length of {MAX_IDENTIFIER_LEN}"),
        });
    }

    Ok(())
}

/// Returns true if `id` has the shape of a full entity ID.
pub(crate) fn is_full_id(id: &str) -> bool {
    id.len() == FULL_ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Finds the entity `id` names: full ID, then name, then unique ID prefix.
pub(crate) fn find_by_identifier<T: Entity>(items: &[Arc<T>], id: &str) -> Result<Arc<T>> {
    validate_identifier::<T>(id)?;

    if let Some(found) = items.iter().find(|e| e.id() == id) {
        return Ok(Arc::clone(found));
    }

    if let Some(found) = items.iter().find(|e| e.name() == id) {
        return Ok(Arc::clone(found));
    }

    let candidates: Vec<&Arc<T>> = items.iter().filter(|e| e.id().starts_with(id)).collect();
    match candidates.as_slice() {
        [] => Err(Error::not_found(T::KIND, id)),
        [only] => Ok(Arc::clone(only)),
        many => Err(Error::AmbiguousId {
            kind: T::KIND,
            id: id.to_string(),
            matches: many.iter().map(|e| e.id().to_string()).collect(),
        }),
    }
}

/// Returns the most recently created entity; on equal timestamps the one
/// later in `items` wins.
pub(crate) fn pick_latest<T: Entity>(items: &[Arc<T>]) -> Result<Arc<T>> {
    items
        .iter()
        .max_by_key(|e| e.created_at())
        .map(Arc::clone)
        .ok_or(Error::NoLatest(T::KIND))
}
