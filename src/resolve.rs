//! Selection resolution.
//!
//! Turns a `SelectionRequest` into entity handles:
//!
//! ```text
//!   SelectionRequest ──▶ selection()
//!                           │
//!          ┌────────────────┼──────────────────┐
//!          ▼                ▼                  ▼
//!      list_all()      get_latest()      lookup_batch(ids)
//!    (all or error)  (one or error)   (successes + failures)
//! ```
//!
//! # Failure Policy
//!
//! `all` and `latest` are all-or-nothing: their error is returned unchanged
//! and no entities come back. Identifier lookups are best-effort: every
//! identifier is tried in order, each failure is logged at DEBUG and kept in
//! the `Resolution`, and successes accumulate regardless. Callers pick how to
//! surface failures (`into_parts` for first-error-wins, `into_result` for
//! strict, `failures` for the full set).

use crate::error::{Error, Result};
use crate::runtime::{Catalog, ContainerCatalog, PodCatalog, Runtime};
use crate::selection::{Selection, SelectionRequest};
use crate::state::{Container, Pod};
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// Resolution
// =============================================================================

/// An identifier that failed to resolve.
#[derive(Debug)]
pub struct LookupFailure {
    /// Position of the identifier in the request.
    pub index: usize,
    /// The identifier as given.
    pub id: String,
    /// Why the lookup failed.
    pub error: Error,
}

/// Outcome of a resolution that did not fail outright.
///
/// `entities` is in request order for identifier lookups, with no
/// placeholders for failed identifiers. `failures` is in request order too.
#[derive(Debug)]
pub struct Resolution<E> {
    entities: Vec<E>,
    failures: Vec<LookupFailure>,
}

impl<E> Resolution<E> {
    fn from_entities(entities: Vec<E>) -> Self {
        Self {
            entities,
            failures: Vec::new(),
        }
    }

    /// Resolved entities.
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    /// Identifiers that failed, in request order.
    pub fn failures(&self) -> &[LookupFailure] {
        &self.failures
    }

    /// Returns true if nothing failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns true if some identifiers resolved and some failed.
    pub fn is_partial(&self) -> bool {
        !self.entities.is_empty() && !self.failures.is_empty()
    }

    /// The first failure's error, if any.
    pub fn first_error(&self) -> Option<&Error> {
        self.failures.first().map(|f| &f.error)
    }

    /// Splits into entities and the first failure's error.
    ///
    /// A `Some` error next to a non-empty vector means partial success.
    pub fn into_parts(self) -> (Vec<E>, Option<Error>) {
        let first = self.failures.into_iter().next().map(|f| f.error);
        (self.entities, first)
    }

    /// Returns the entities if every identifier resolved, otherwise the
    /// first failure's error.
    pub fn into_result(self) -> Result<Vec<E>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(self.entities),
        }
    }

    /// Splits into entities and the full failure list.
    pub fn into_inner(self) -> (Vec<E>, Vec<LookupFailure>) {
        (self.entities, self.failures)
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Resolves a request against one entity kind.
///
/// # Errors
///
/// Returns the catalog's error unchanged when `all` or `latest` fails.
/// Identifier failures never produce `Err`; they are in
/// [`Resolution::failures`].
pub fn resolve<C: Catalog>(
    request: &SelectionRequest,
    catalog: &C,
) -> Result<Resolution<C::Entity>> {
    let selection = request.selection();
    debug!(
        runtime = %catalog.source(),
        kind = %catalog.kind(),
        selection = %selection,
        "resolving selection"
    );

    match selection {
        Selection::All => Ok(Resolution::from_entities(catalog.list_all()?)),
        Selection::Latest => {
            let latest = catalog.get_latest()?;
            Ok(Resolution::from_entities(vec![latest]))
        }
        Selection::Identifiers(ids) => Ok(lookup_batch(catalog, ids)),
    }
}

/// Looks up every identifier in order, keeping successes and failures.
///
/// Never stops early. Each failure is logged at DEBUG with the identifier
/// and error before the next identifier is tried.
pub fn lookup_batch<C, S>(catalog: &C, ids: &[S]) -> Resolution<C::Entity>
where
    C: Catalog,
    S: AsRef<str>,
{
    let kind = catalog.kind();
    let source = catalog.source();
    let mut entities = Vec::with_capacity(ids.len());
    let mut failures = Vec::new();

    for (index, id) in ids.iter().enumerate() {
        let id = id.as_ref();
        match catalog.lookup(id) {
            Ok(entity) => entities.push(entity),
            Err(error) => {
                debug!(
                    runtime = %source,
                    kind = %kind,
                    id = %id,
                    error = %error,
                    "error looking up identifier"
                );
                failures.push(LookupFailure {
                    index,
                    id: id.to_string(),
                    error,
                });
            }
        }
    }

    Resolution { entities, failures }
}

// =============================================================================
// Per-kind entry points
// =============================================================================

/// Resolves a request to pods.
pub fn resolve_pods<R: Runtime + ?Sized>(
    request: &SelectionRequest,
    runtime: &R,
) -> Result<Resolution<Arc<Pod>>> {
    resolve(request, &PodCatalog::new(runtime))
}

/// Resolves a request to containers.
pub fn resolve_containers<R: Runtime + ?Sized>(
    request: &SelectionRequest,
    runtime: &R,
) -> Result<Resolution<Arc<Container>>> {
    resolve(request, &ContainerCatalog::new(runtime))
}

/// Returns pods selected by `all`, `latest` or `ids`, with the first error.
///
/// The three selectors are meant to be mutually exclusive; if several are
/// set, `all` wins, then `latest`. A `Some` error alongside pods means some
/// identifiers failed; every failure has already been logged.
pub fn pods_by_context<R: Runtime + ?Sized>(
    all: bool,
    latest: bool,
    ids: &[String],
    runtime: &R,
) -> (Vec<Arc<Pod>>, Option<Error>) {
    let request = SelectionRequest::new(all, latest, ids.to_vec());
    first_error_wins(resolve_pods(&request, runtime))
}

/// Returns containers selected by `all`, `latest` or `ids`, with the first
/// error. Same contract as [`pods_by_context`].
pub fn containers_by_context<R: Runtime + ?Sized>(
    all: bool,
    latest: bool,
    ids: &[String],
    runtime: &R,
) -> (Vec<Arc<Container>>, Option<Error>) {
    let request = SelectionRequest::new(all, latest, ids.to_vec());
    first_error_wins(resolve_containers(&request, runtime))
}

fn first_error_wins<E>(resolved: Result<Resolution<E>>) -> (Vec<E>, Option<Error>) {
    match resolved {
        Ok(resolution) => resolution.into_parts(),
        Err(err) => (Vec::new(), Some(err)),
    }
}
