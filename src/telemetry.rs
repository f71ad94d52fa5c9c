//! Telemetry metric name constants.
//!
//! Centralised metric names for lyceum operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `lyceum_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `resource`: logical resource of the cache key (e.g. "courses")
//! - `scope`: invalidation scope: "key", "resource" or "all"
//! - `method`: HTTP method (e.g. "GET", "POST")
//! - `status`: outcome: "ok" or "error"

/// Total cache lookups that returned a valid entry.
///
/// Labels: `resource`.
pub const CACHE_HITS_TOTAL: &str = "lyceum_cache_hits_total";

/// Total cache lookups that found nothing usable (absent or expired).
///
/// Labels: `resource`.
pub const CACHE_MISSES_TOTAL: &str = "lyceum_cache_misses_total";

/// Total entries purged on lookup because their TTL had elapsed.
///
/// Labels: `resource`.
pub const CACHE_EXPIRED_TOTAL: &str = "lyceum_cache_expired_total";

/// Total explicit invalidations.
///
/// Labels: `scope` ("key" | "resource" | "all").
pub const CACHE_INVALIDATIONS_TOTAL: &str = "lyceum_cache_invalidations_total";

/// Total HTTP requests sent by the transport.
///
/// Labels: `method`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "lyceum_requests_total";

/// HTTP request duration in seconds.
///
/// Labels: `method`.
pub const REQUEST_DURATION_SECONDS: &str = "lyceum_request_duration_seconds";
