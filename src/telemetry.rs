//! Telemetry metric name constants.
//!
//! Centralised metric names for gateway operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model`: requested model name
//! - `status`: outcome: "ok" or "error"
//! - `source`: where a successful answer came from: "cache" or "completion"
//! - `operation`: cache store operation: "get", "set" or "increment"

/// Total gateway invocations.
///
/// Labels: `model`, `status` ("ok" | "error"), `source` ("cache" | "completion" | "none").
pub const REQUESTS_TOTAL: &str = "huginn_requests_total";

/// Gateway invocation duration in seconds.
///
/// Labels: `model`.
pub const REQUEST_DURATION_SECONDS: &str = "huginn_request_duration_seconds";

/// Total completion-service calls, one per credential attempted.
///
/// Labels: `client`, `status` ("ok" | "error").
pub const COMPLETION_CALLS_TOTAL: &str = "huginn_completion_calls_total";

/// Total rotations to the next credential after a rate-limit failure.
///
/// Labels: `model`.
pub const ROTATIONS_TOTAL: &str = "huginn_rotations_total";

/// Total response cache hits.
///
/// Labels: `model`.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total response cache misses (including lookups that failed).
///
/// Labels: `model`.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Total cache store failures absorbed by the gateway.
///
/// Labels: `operation` ("get" | "set" | "increment").
pub const CACHE_STORE_ERRORS_TOTAL: &str = "huginn_cache_store_errors_total";
