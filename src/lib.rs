//! # magiksel
//!
//! **Pod and Container Selection for Runtime CLIs**
//!
//! Commands such as `stop`, `inspect` or `rm` take either `--all`, `--latest`
//! or a list of names/IDs. This crate turns that selection into runtime
//! handles, once, for both pods and containers.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           magiksel                                  │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │   SelectionRequest { all, latest, identifiers }                     │
//! │                              │                                      │
//! │                              ▼                                      │
//! │   resolve(request, catalog)  ── all ──────▶ Catalog::list_all       │
//! │                              ── latest ───▶ Catalog::get_latest     │
//! │                              ── ids ──────▶ lookup_batch            │
//! │                                             (best effort, logged)   │
//! │                              │                                      │
//! │                              ▼                                      │
//! │   Resolution { entities, failures }                                 │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │   Catalog = PodCatalog(&Runtime) | ContainerCatalog(&Runtime)       │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                       Runtime Backends                              │
//! │  ┌──────────────────┐            ┌─────────────────────────┐        │
//! │  │  MemoryRuntime   │            │    StateDirRuntime      │        │
//! │  │ insertion order  │            │ <root>/<kind>/<id>/...  │        │
//! │  └──────────────────┘            └─────────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Selection Semantics
//!
//! | Mode        | Returns                         | On error                    |
//! |-------------|---------------------------------|-----------------------------|
//! | all         | every entity, runtime order     | error, no entities          |
//! | latest      | the newest entity               | error, no entities          |
//! | identifiers | resolved entities, input order  | successes + every failure   |
//!
//! Modes are mutually exclusive by contract. If more than one is set, `all`
//! wins, then `latest`. Identifiers are not deduplicated.
//!
//! # Example
//!
//! ```rust,ignore
//! use magiksel::{MemoryRuntime, Pod, SelectionRequest, resolve_pods};
//!
//! let runtime = MemoryRuntime::new();
//! runtime.insert_pod(Pod::new("web"))?;
//!
//! let resolution = resolve_pods(&SelectionRequest::ids(["web", "db"]), &runtime)?;
//! let (pods, first_error) = resolution.into_parts();
//! // pods = [web], first_error = Some(PodNotFound("db"))
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod resolve;
pub mod runtime;
pub mod selection;
pub mod state;
pub mod store;

// Re-exports
pub use config::{Config, default_state_root};
pub use error::{Error, Result};
pub use resolve::{
    LookupFailure, Resolution, containers_by_context, lookup_batch, pods_by_context, resolve,
    resolve_containers, resolve_pods,
};
pub use runtime::{Catalog, ContainerCatalog, PodCatalog, Runtime};
pub use selection::{Selection, SelectionRequest};
pub use state::{Container, ContainerStatus, Entity, EntityKind, Pod, PodStatus};
pub use store::{MemoryRuntime, StateDirRuntime};
