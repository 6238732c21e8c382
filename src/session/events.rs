//! Outbound channels of a session.
//!
//! Calls for the transport and events for the UI leave through unbounded
//! channels so that dispatch never waits on a consumer.

use quassel_proto::{BufferId, OutboundCall};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::phase::ConnectionPhase;

/// Notifications for external collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    PhaseChanged {
        from: ConnectionPhase,
        to: ConnectionPhase,
    },
    /// A buffer was built, changed, removed, or received messages.
    BufferUpdated { buffer_id: BufferId },
    LagChanged { latency_ms: u64 },
    StatusMessage { network: String, message: String },
    PasswordChanged { success: bool },
    /// High-priority notice the user must see.
    CriticalError { message: String },
}

/// Receiving ends handed to the embedding application.
pub struct SessionChannels {
    pub outbound: mpsc::UnboundedReceiver<OutboundCall>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

/// Sending ends owned by the session.
#[derive(Clone)]
pub(crate) struct Outbox {
    outbound: mpsc::UnboundedSender<OutboundCall>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl Outbox {
    pub(crate) fn channel() -> (Self, SessionChannels) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                outbound: outbound_tx,
                events: events_tx,
            },
            SessionChannels {
                outbound: outbound_rx,
                events: events_rx,
            },
        )
    }

    pub(crate) fn send(&self, call: OutboundCall) {
        let kind = call.kind();
        debug!(kind, ?call, "Outbound call");
        crate::metrics::record_outbound(kind);
        if self.outbound.send(call).is_err() {
            debug!(kind, "Outbound receiver closed, dropping call");
        }
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.events.send(event) {
            debug!(event = ?e.0, "Event receiver closed, dropping event");
        }
    }
}
