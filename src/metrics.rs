//! Prometheus metrics collection for the session engine.
//!
//! Nothing here is exported over HTTP; the `qsession` binary dumps the text
//! encoding at exit when `[metrics] enabled = true`.
//!
//! - `quassel_inbound_calls_total{kind}` - Inbound calls dispatched by kind
//! - `quassel_dispatch_duration_seconds{kind}` - Dispatch latency histogram
//! - `quassel_dispatch_errors_total{kind,error}` - Skipped or fatal calls
//! - `quassel_pending_init_requests` / `quassel_pending_backlog_requests` - Tracker sizes

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Inbound calls by kind.
pub static INBOUND_CALLS: OnceLock<IntCounterVec> = OnceLock::new();

/// Dispatch latency by kind.
pub static DISPATCH_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Dispatch errors by kind and error code.
pub static DISPATCH_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Mutations parked in the deferred buffer.
pub static DEFERRED_MUTATIONS: OnceLock<IntCounter> = OnceLock::new();

/// Deferred mutations applied after their object initialized.
pub static DEFERRED_REPLAYS: OnceLock<IntCounter> = OnceLock::new();

/// Deferred mutations replaced by a later one for the same key.
pub static DEFERRED_OVERWRITES: OnceLock<IntCounter> = OnceLock::new();

/// Phase transitions by target phase.
pub static PHASE_TRANSITIONS: OnceLock<IntCounterVec> = OnceLock::new();

/// Outbound calls by kind.
pub static OUTBOUND_CALLS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

pub static PENDING_INIT_REQUESTS: OnceLock<IntGauge> = OnceLock::new();

pub static PENDING_BACKLOG_REQUESTS: OnceLock<IntGauge> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Recording before this is called is a silent no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(metric = stringify!($metric), error = %e, "Failed to register metric");
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::error!(metric = stringify!($metric), error = %e, "Failed to create metric");
                }
            }
        };
    }

    register!(INBOUND_CALLS, IntCounterVec::new(Opts::new("quassel_inbound_calls_total", "Inbound calls dispatched by kind"), &["kind"]));
    register!(DISPATCH_LATENCY, HistogramVec::new(
        HistogramOpts::new("quassel_dispatch_duration_seconds", "Inbound dispatch latency by kind")
            .buckets(vec![0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["kind"]));
    register!(DISPATCH_ERRORS, IntCounterVec::new(Opts::new("quassel_dispatch_errors_total", "Inbound dispatch errors by kind"), &["kind", "error"]));
    register!(DEFERRED_MUTATIONS, IntCounter::new("quassel_deferred_mutations_total", "Mutations deferred until their object initializes"));
    register!(DEFERRED_REPLAYS, IntCounter::new("quassel_deferred_replays_total", "Deferred mutations replayed after init"));
    register!(DEFERRED_OVERWRITES, IntCounter::new("quassel_deferred_overwrites_total", "Deferred mutations replaced by a later one"));
    register!(PHASE_TRANSITIONS, IntCounterVec::new(Opts::new("quassel_phase_transitions_total", "Connection phase transitions by target phase"), &["phase"]));
    register!(OUTBOUND_CALLS, IntCounterVec::new(Opts::new("quassel_outbound_calls_total", "Outbound calls by kind"), &["kind"]));
    register!(PENDING_INIT_REQUESTS, IntGauge::new("quassel_pending_init_requests", "Init requests awaiting a response"));
    register!(PENDING_BACKLOG_REQUESTS, IntGauge::new("quassel_pending_backlog_requests", "Buffers awaiting their first backlog page"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

fn get_counter(metric: &OnceLock<IntCounter>) -> Option<&IntCounter> {
    metric.get()
}

fn get_counter_vec(metric: &OnceLock<IntCounterVec>) -> Option<&IntCounterVec> {
    metric.get()
}

fn get_gauge(metric: &OnceLock<IntGauge>) -> Option<&IntGauge> {
    metric.get()
}

/// Record an inbound dispatch with latency.
#[inline]
pub fn record_dispatch(kind: &str, duration_secs: f64) {
    if let Some(c) = get_counter_vec(&INBOUND_CALLS) {
        c.with_label_values(&[kind]).inc();
    }
    if let Some(h) = DISPATCH_LATENCY.get() {
        h.with_label_values(&[kind]).observe(duration_secs);
    }
}

/// Record a dispatch error.
#[inline]
pub fn record_dispatch_error(kind: &str, error: &str) {
    if let Some(c) = get_counter_vec(&DISPATCH_ERRORS) {
        c.with_label_values(&[kind, error]).inc();
    }
}

#[inline]
pub fn record_deferred(overwritten: bool) {
    if let Some(c) = get_counter(&DEFERRED_MUTATIONS) {
        c.inc();
    }
    if overwritten {
        if let Some(c) = get_counter(&DEFERRED_OVERWRITES) {
            c.inc();
        }
    }
}

#[inline]
pub fn record_deferred_replay() {
    if let Some(c) = get_counter(&DEFERRED_REPLAYS) {
        c.inc();
    }
}

#[inline]
pub fn record_phase_transition(phase: &str) {
    if let Some(c) = get_counter_vec(&PHASE_TRANSITIONS) {
        c.with_label_values(&[phase]).inc();
    }
}

#[inline]
pub fn record_outbound(kind: &str) {
    if let Some(c) = get_counter_vec(&OUTBOUND_CALLS) {
        c.with_label_values(&[kind]).inc();
    }
}

/// Update both tracker gauges.
#[inline]
pub fn set_pending(init: usize, backlog: usize) {
    if let Some(g) = get_gauge(&PENDING_INIT_REQUESTS) {
        g.set(init as i64);
    }
    if let Some(g) = get_gauge(&PENDING_BACKLOG_REQUESTS) {
        g.set(backlog as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();

        record_dispatch("mutation", 0.0001);
        record_deferred(true);
        record_phase_transition("connecting");
        set_pending(5, 0);

        let output = gather_metrics();
        assert!(output.contains("quassel_inbound_calls_total"));
        assert!(output.contains("quassel_deferred_overwrites_total"));
        assert!(output.contains("quassel_pending_init_requests"));
    }
}
