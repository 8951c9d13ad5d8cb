//! Tests for selection resolution.
//!
//! Covers mode priority, best-effort identifier lookups, ordering and
//! duplicate handling, error propagation for `all`/`latest`, and the
//! per-failure diagnostic log.

use chrono::{Duration, Utc};
use magiksel::{
    Container, Error, MemoryRuntime, Pod, Runtime, SelectionRequest, containers_by_context,
    pods_by_context, resolve_containers, resolve_pods,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

// =============================================================================
// Test Helpers
// =============================================================================

/// Pods z, x, w (x newest) and containers web, db (web newest). No pod "y".
fn runtime() -> MemoryRuntime {
    let now = Utc::now();
    let rt = MemoryRuntime::new();
    rt.insert_pod(Pod::new("z").with_created_at(now - Duration::seconds(30)))
        .unwrap();
    rt.insert_pod(Pod::new("x").with_created_at(now)).unwrap();
    rt.insert_pod(Pod::new("w").with_created_at(now - Duration::seconds(60)))
        .unwrap();
    rt.insert_container(Container::new("web", "nginx").with_created_at(now))
        .unwrap();
    rt.insert_container(
        Container::new("db", "postgres").with_created_at(now - Duration::seconds(5)),
    )
    .unwrap();
    rt
}

fn pod_names(pods: &[Arc<Pod>]) -> Vec<&str> {
    pods.iter().map(|p| p.name.as_str()).collect()
}

fn container_names(containers: &[Arc<Container>]) -> Vec<&str> {
    containers.iter().map(|c| c.name.as_str()).collect()
}

/// Runtime whose bulk operations fail and which counts lookups.
struct BrokenRuntime {
    inner: MemoryRuntime,
    lookups: AtomicUsize,
}

impl BrokenRuntime {
    fn new() -> Self {
        Self {
            inner: runtime(),
            lookups: AtomicUsize::new(0),
        }
    }
}

impl Runtime for BrokenRuntime {
    fn name(&self) -> &str {
        "broken"
    }

    fn all_pods(&self) -> magiksel::Result<Vec<Arc<Pod>>> {
        Err(Error::Backend("pod index unavailable".to_string()))
    }

    fn latest_pod(&self) -> magiksel::Result<Arc<Pod>> {
        Err(Error::Backend("pod index unavailable".to_string()))
    }

    fn lookup_pod(&self, id: &str) -> magiksel::Result<Arc<Pod>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_pod(id)
    }

    fn all_containers(&self) -> magiksel::Result<Vec<Arc<Container>>> {
        Err(Error::Backend("container index unavailable".to_string()))
    }

    fn latest_container(&self) -> magiksel::Result<Arc<Container>> {
        Err(Error::Backend("container index unavailable".to_string()))
    }

    fn lookup_container(&self, id: &str) -> magiksel::Result<Arc<Container>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_container(id)
    }
}

/// Shared buffer the fmt subscriber writes into.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with DEBUG logs captured and returns its output and the logs.
fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(buf.clone())
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    (out, logs)
}

// =============================================================================
// Mode Priority
// =============================================================================

#[test]
fn test_all_returns_listing_unmodified() {
    let rt = runtime();
    let pods = resolve_pods(&SelectionRequest::all(), &rt)
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(pods, rt.all_pods().unwrap());
}

#[test]
fn test_all_ignores_latest_and_identifiers() {
    let rt = runtime();
    let request = SelectionRequest::new(true, true, vec!["missing".to_string()]);
    let resolution = resolve_pods(&request, &rt).unwrap();

    assert!(resolution.is_complete());
    assert_eq!(pod_names(resolution.entities()), vec!["z", "x", "w"]);
}

#[test]
fn test_latest_wraps_single_entity() {
    let rt = runtime();
    let pods = resolve_pods(&SelectionRequest::latest(), &rt)
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(pod_names(&pods), vec!["x"]);

    let containers = resolve_containers(&SelectionRequest::latest(), &rt)
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(container_names(&containers), vec!["web"]);
}

#[test]
fn test_latest_ignores_identifiers() {
    let rt = runtime();
    let request = SelectionRequest::new(false, true, vec!["z".to_string(), "w".to_string()]);
    let (pods, err) = resolve_pods(&request, &rt).unwrap().into_parts();
    assert_eq!(pod_names(&pods), vec!["x"]);
    assert!(err.is_none());
}

#[test]
fn test_latest_on_empty_runtime_fails() {
    let rt = MemoryRuntime::new();
    let err = resolve_containers(&SelectionRequest::latest(), &rt).unwrap_err();
    assert!(matches!(err, Error::NoLatest(magiksel::EntityKind::Container)));
}

// =============================================================================
// Identifier Lookups
// =============================================================================

#[test]
fn test_missing_identifier_is_skipped_and_logged() {
    let rt = runtime();
    let ((pods, err), logs) = with_captured_logs(|| {
        pods_by_context(false, false, &["x".into(), "y".into(), "z".into()], &rt)
    });

    assert_eq!(pod_names(&pods), vec!["x", "z"]);
    assert!(matches!(err, Some(Error::PodNotFound(ref id)) if id == "y"));
    assert!(logs.contains("error looking up identifier"), "logs: {logs}");
    assert!(logs.contains("id=y"), "logs: {logs}");
    assert!(logs.contains("no such pod: y"), "logs: {logs}");
}

#[test]
fn test_failure_log_names_the_runtime() {
    let rt = MemoryRuntime::with_name("node-a");
    let ((_, err), logs) =
        with_captured_logs(|| containers_by_context(false, false, &["gone".into()], &rt));

    assert!(err.is_some());
    assert!(logs.contains("runtime=node-a"), "logs: {logs}");
    assert!(logs.contains("id=gone"), "logs: {logs}");
}

#[test]
fn test_duplicates_are_preserved() {
    let rt = runtime();
    let (pods, err) = pods_by_context(false, false, &["x".into(), "x".into()], &rt);

    assert!(err.is_none());
    assert_eq!(pods.len(), 2);
    assert!(Arc::ptr_eq(&pods[0], &pods[1]));
}

#[test]
fn test_output_follows_input_order() {
    let rt = runtime();
    let ids = vec!["w".to_string(), "x".to_string(), "z".to_string()];
    let (pods, _) = pods_by_context(false, false, &ids, &rt);
    assert_eq!(pod_names(&pods), vec!["w", "x", "z"]);

    let reversed: Vec<String> = ids.into_iter().rev().collect();
    let (pods, _) = pods_by_context(false, false, &reversed, &rt);
    assert_eq!(pod_names(&pods), vec!["z", "x", "w"]);
}

#[test]
fn test_first_error_wins_but_all_failures_kept() {
    let rt = runtime();
    let request = SelectionRequest::ids(["nope", "web", "gone"]);
    let resolution = resolve_containers(&request, &rt).unwrap();

    assert!(resolution.is_partial());
    assert_eq!(container_names(resolution.entities()), vec!["web"]);

    let failed: Vec<(usize, &str)> = resolution
        .failures()
        .iter()
        .map(|f| (f.index, f.id.as_str()))
        .collect();
    assert_eq!(failed, vec![(0, "nope"), (2, "gone")]);

    assert!(matches!(
        resolution.first_error(),
        Some(Error::ContainerNotFound(id)) if id == "nope"
    ));
}

#[test]
fn test_every_failure_logged_in_order() {
    let rt = runtime();
    let ((containers, err), logs) = with_captured_logs(|| {
        containers_by_context(false, false, &["q1".into(), "q2".into()], &rt)
    });

    assert!(containers.is_empty());
    assert!(matches!(err, Some(Error::ContainerNotFound(ref id)) if id == "q1"));

    let first = logs.find("id=q1").expect("q1 logged");
    let second = logs.find("id=q2").expect("q2 logged");
    assert!(first < second);
}

#[test]
fn test_empty_identifiers_yield_nothing() {
    let rt = runtime();
    let (pods, err) = pods_by_context(false, false, &[], &rt);
    assert!(pods.is_empty());
    assert!(err.is_none());
}

#[test]
fn test_resolution_is_idempotent() {
    let rt = runtime();
    let ids = vec!["x".to_string(), "nope".to_string()];

    let (first, first_err) = pods_by_context(false, false, &ids, &rt);
    let (second, second_err) = pods_by_context(false, false, &ids, &rt);

    assert_eq!(first, second);
    assert!(matches!(first_err, Some(Error::PodNotFound(_))));
    assert!(matches!(second_err, Some(Error::PodNotFound(_))));
}

#[test]
fn test_lookup_by_id_prefix() {
    let rt = runtime();
    let web = rt.lookup_container("web").unwrap();
    let prefix = web.id[..12].to_string();

    let (containers, err) = containers_by_context(false, false, &[prefix], &rt);
    assert!(err.is_none());
    assert!(Arc::ptr_eq(&containers[0], &web));
}

// =============================================================================
// Bulk Failures
// =============================================================================

#[test]
fn test_all_failure_propagates_without_fallback() {
    let rt = BrokenRuntime::new();
    let (pods, err) = pods_by_context(true, false, &["x".into()], &rt);

    assert!(pods.is_empty());
    assert!(matches!(err, Some(Error::Backend(ref msg)) if msg == "pod index unavailable"));
    assert_eq!(rt.lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn test_latest_failure_propagates_without_fallback() {
    let rt = BrokenRuntime::new();
    let err = resolve_containers(&SelectionRequest::new(false, true, vec!["web".into()]), &rt)
        .unwrap_err();

    assert!(matches!(err, Error::Backend(_)));
    assert_eq!(rt.lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn test_identifier_mode_unaffected_by_broken_listing() {
    let rt = BrokenRuntime::new();
    let (containers, err) = containers_by_context(false, false, &["db".into()], &rt);

    assert!(err.is_none());
    assert_eq!(container_names(&containers), vec!["db"]);
    assert_eq!(rt.lookups.load(Ordering::SeqCst), 1);
}

#[test]
fn test_runtime_as_trait_object() {
    let rt: Box<dyn Runtime> = Box::new(runtime());
    let (pods, err) = pods_by_context(false, false, &["z".into()], rt.as_ref());
    assert!(err.is_none());
    assert_eq!(pod_names(&pods), vec!["z"]);
}
