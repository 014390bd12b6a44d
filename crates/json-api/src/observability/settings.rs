//! Settings the request middleware reads on every request.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::observability::ObservabilityConfig;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);
static JOIN_CALLER_TRACES: AtomicBool = AtomicBool::new(false);

pub(super) fn apply(config: &ObservabilityConfig) {
    SLOW_REQUEST_THRESHOLD_MS.store(config.slow_request_threshold_ms, Ordering::Relaxed);
    JOIN_CALLER_TRACES.store(config.otel_enabled, Ordering::Relaxed);
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed)
}

/// Whether request spans continue a `traceparent` sent by the caller.
pub(super) fn join_caller_traces() -> bool {
    JOIN_CALLER_TRACES.load(Ordering::Relaxed)
}
