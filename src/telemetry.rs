//! Telemetry metric name constants.
//!
//! Centralised metric names for aniki operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `aniki_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model` — candidate model identifier (e.g. "openai/gpt-3.5-turbo")
//! - `operation` — pipeline entry point ("converse" | "category")
//! - `status` — outcome: "ok" or "error"
//! - `direction` — token direction: "prompt" or "completion"

/// Total model requests dispatched through the fallback chain.
///
/// Labels: `model`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "aniki_requests_total";

/// Model request duration in seconds, including retries and fallback.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "aniki_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `model`.
pub const RETRIES_TOTAL: &str = "aniki_retries_total";

/// Total tokens consumed, as reported by the endpoint.
///
/// Labels: `model`, `direction` ("prompt" | "completion").
pub const TOKENS_TOTAL: &str = "aniki_tokens_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "aniki_cache_hits_total";

/// Total response cache misses.
pub const CACHE_MISSES_TOTAL: &str = "aniki_cache_misses_total";
