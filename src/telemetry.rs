//! Telemetry utilities for dispatch timing and span correlation.

use std::time::Instant;

/// Guard for timing an inbound dispatch and recording metrics.
///
/// Records dispatch latency when dropped.
pub struct DispatchTimer {
    kind: &'static str,
    start: Instant,
}

impl DispatchTimer {
    /// Start timing a dispatch.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            start: Instant::now(),
        }
    }
}

impl Drop for DispatchTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_dispatch(self.kind, duration);
    }
}

/// Standardized span constructors for session observability.
pub mod spans {
    use tracing::{Span, debug_span, info_span};
    use uuid::Uuid;

    /// Span covering one session, from connect to disconnect.
    pub fn session(session_id: &Uuid) -> Span {
        info_span!("session", id = %session_id)
    }

    /// Span for a single inbound call.
    pub fn dispatch(kind: &str, type_tag: Option<&str>, name: Option<&str>) -> Span {
        match (type_tag, name) {
            (Some(type_tag), Some(name)) => {
                debug_span!("dispatch", kind = %kind, type_tag = %type_tag, name = %name)
            }
            _ => debug_span!("dispatch", kind = %kind),
        }
    }
}
