//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use huginn::cache::{MemoryStore, UnconfiguredStore};
use huginn::providers::CompletionClient;
use huginn::telemetry;
use huginn::{ChatRequest, Gateway, Huginn, HuginnError, LlmGateway, Message, Result};

// ============================================================================
// Mock clients
// ============================================================================

struct EchoClient;

#[async_trait]
impl CompletionClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, _credential: &str, request: &ChatRequest) -> Result<String> {
        Ok(request.messages.last().map(|m| m.content.clone()).unwrap_or_default())
    }
}

/// Rate limits every key except `good`.
struct PickyClient;

#[async_trait]
impl CompletionClient for PickyClient {
    fn name(&self) -> &str {
        "picky"
    }

    async fn complete(&self, credential: &str, _request: &ChatRequest) -> Result<String> {
        if credential == "good" {
            Ok("ok".into())
        } else {
            Err(HuginnError::RateLimited { retry_after: None })
        }
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for `name` whose labels include `label = value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

fn request(ttl: u64) -> ChatRequest {
    ChatRequest::new("metrics-model", vec![Message::user("ping")]).ttl(ttl)
}

/// Run `f` against a fresh recorder and return what it captured.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the gateway.
fn record<F, Fut>(f: F) -> SnapshotVec
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(f()))
    });

    snapshotter.snapshot().into_vec()
}

fn echo_gateway() -> LlmGateway {
    Huginn::builder()
        .completion_client(Arc::new(EchoClient))
        .cache_store(Arc::new(MemoryStore::new()))
        .api_keys(["k0"])
        .build()
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_request_records_metrics() {
    let gateway = echo_gateway();
    let snapshot = record(|| async {
        gateway.invoke(&request(0)).await.unwrap();
    });

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::COMPLETION_CALLS_TOTAL), 1);
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_and_misses_are_counted() {
    let gateway = echo_gateway();
    let snapshot = record(|| async {
        gateway.invoke(&request(60)).await.unwrap();
        gateway.invoke(&request(60)).await.unwrap();
    });

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "source", "cache"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "source", "completion"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn rotations_are_counted() {
    let store = Arc::new(MemoryStore::new());
    let gateway = Huginn::builder()
        .completion_client(Arc::new(PickyClient))
        .cache_store(store)
        .api_keys(["bad-1", "bad-2", "good"])
        .build()
        .unwrap();

    // First increment yields 1: start at bad-2, rotate once to good.
    let snapshot = record(|| async {
        gateway.invoke(&request(0)).await.unwrap();
    });

    assert_eq!(counter_total(&snapshot, telemetry::ROTATIONS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::COMPLETION_CALLS_TOTAL, "status", "error"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_request_records_error_status() {
    let gateway = Huginn::builder()
        .completion_client(Arc::new(PickyClient))
        .cache_store(Arc::new(MemoryStore::new()))
        .api_keys(["bad"])
        .build()
        .unwrap();

    let snapshot = record(|| async {
        assert!(gateway.invoke(&request(0)).await.is_err());
    });

    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::ROTATIONS_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn store_errors_are_counted_per_operation() {
    let gateway = Huginn::builder()
        .completion_client(Arc::new(EchoClient))
        .cache_store(Arc::new(UnconfiguredStore))
        .api_keys(["k0"])
        .build()
        .unwrap();

    let snapshot = record(|| async {
        gateway.invoke(&request(60)).await.unwrap();
    });

    for operation in ["get", "increment", "set"] {
        assert_eq!(
            counter_with_label(
                &snapshot,
                telemetry::CACHE_STORE_ERRORS_TOTAL,
                "operation",
                operation
            ),
            1,
            "expected one {operation} error"
        );
    }
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let gateway = echo_gateway();
    assert_eq!(gateway.invoke(&request(0)).await.unwrap(), "ping");
}
