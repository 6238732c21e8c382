//! Session facade.
//!
//! A [`Session`] owns every directory, tracker and buffer of one client
//! connection and is driven from a single task:
//!
//! - transport reports: [`Session::connect`], [`Session::establish`],
//!   [`Session::disconnect`]
//! - inbound calls: [`Session::dispatch_inbound`]
//! - user actions: [`Session::send_input`]
//!
//! Outbound calls and events leave through [`SessionChannels`]; other
//! threads read through a [`SessionReader`].

mod bootstrap;
mod dispatch;
mod events;
mod snapshot;

pub use events::{SessionChannels, SessionEvent};
pub use snapshot::{SessionReader, SessionSnapshot};

use std::sync::Arc;

use chrono::Utc;
use quassel_proto::{BufferInfo, OutboundCall, RpcCall, TypeTag};
use tracing::{Span, info, warn};
use uuid::Uuid;

use self::events::Outbox;
use crate::buffers::BufferDirectory;
use crate::config::SessionConfig;
use crate::deferred::DeferredMutations;
use crate::error::SyncResult;
use crate::model::SyncObject;
use crate::phase::{ConnectionPhase, PhaseMachine};
use crate::registry::ObjectRegistry;
use crate::storage::BacklogStorage;
use crate::telemetry::spans;
use crate::tracker::{BacklogTracker, InitTracker};

pub struct Session {
    config: SessionConfig,
    session_id: Option<Uuid>,
    span: Span,
    phase: PhaseMachine,
    registry: ObjectRegistry,
    buffers: BufferDirectory,
    init_tracker: InitTracker,
    backlog_tracker: BacklogTracker,
    deferred: DeferredMutations,
    latency_ms: Option<u64>,
    storage: Arc<dyn BacklogStorage>,
    outbox: Outbox,
    reader: SessionReader,
}

impl Session {
    pub fn new(config: SessionConfig, storage: Arc<dyn BacklogStorage>) -> (Self, SessionChannels) {
        let (outbox, channels) = Outbox::channel();
        let session = Self {
            config,
            session_id: None,
            span: Span::none(),
            phase: PhaseMachine::new(),
            registry: ObjectRegistry::new(),
            buffers: BufferDirectory::new(),
            init_tracker: InitTracker::new(),
            backlog_tracker: BacklogTracker::new(),
            deferred: DeferredMutations::new(),
            latency_ms: None,
            storage,
            outbox,
            reader: SessionReader::new(),
        };
        (session, channels)
    }

    /// Start a fresh connection attempt. A live session is torn down first.
    pub fn connect(&mut self) -> SyncResult {
        if self.phase.phase() != ConnectionPhase::Disconnected {
            self.disconnect();
        }
        let id = Uuid::new_v4();
        self.session_id = Some(id);
        self.span = spans::session(&id);
        let span = self.span.clone();
        let _enter = span.enter();
        let result = self.advance(ConnectionPhase::Connecting);
        self.publish();
        result
    }

    /// Transport lost. Discards all session state immediately.
    pub fn disconnect(&mut self) {
        if self.phase.phase() == ConnectionPhase::Disconnected {
            return;
        }
        let span = self.span.clone();
        let _enter = span.enter();
        self.registry.clear();
        self.buffers.clear();
        self.init_tracker.clear();
        self.backlog_tracker.clear();
        self.deferred.clear();
        self.latency_ms = None;
        // Any live phase may fall back to Disconnected.
        if let Err(e) = self.advance(ConnectionPhase::Disconnected) {
            warn!(error = %e, "Disconnect transition rejected");
        }
        info!("Session torn down");
        self.session_id = None;
        self.span = Span::none();
        self.publish();
    }

    /// Forward a line of user input. Nothing is tracked locally.
    pub fn send_input(&self, buffer: &BufferInfo, text: &str) {
        if self.phase.phase() == ConnectionPhase::Disconnected {
            warn!(buffer = %buffer.id, "Dropping input while disconnected");
            return;
        }
        self.outbox.send(OutboundCall::Rpc {
            call: RpcCall::SendInput {
                buffer: buffer.clone(),
                text: text.to_string(),
            },
        });
    }

    /// Owned copy of an object. Mutation only happens through dispatch.
    pub fn lookup(&self, tag: TypeTag, name: &str) -> SyncResult<SyncObject> {
        self.registry.lookup(tag, name)
    }

    pub fn reader(&self) -> SessionReader {
        self.reader.clone()
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase.phase()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn buffers(&self) -> &BufferDirectory {
        &self.buffers
    }

    pub fn pending_init(&self) -> usize {
        self.init_tracker.len()
    }

    pub fn pending_backlog(&self) -> usize {
        self.backlog_tracker.len()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Apply a phase transition and announce it.
    fn advance(&mut self, to: ConnectionPhase) -> SyncResult {
        let change = self.phase.transition(to)?;
        info!(from = %change.from, to = %change.to, "Phase changed");
        self.outbox.emit(SessionEvent::PhaseChanged {
            from: change.from,
            to: change.to,
        });
        Ok(())
    }

    fn publish(&self) {
        crate::metrics::set_pending(self.init_tracker.len(), self.backlog_tracker.len());
        self.reader.publish(SessionSnapshot {
            session_id: self.session_id,
            phase: self.phase.phase(),
            registry: self.registry.clone(),
            buffers: self.buffers.clone(),
            latency_ms: self.latency_ms,
            pending_init: self.init_tracker.len(),
            pending_backlog: self.backlog_tracker.len(),
            taken_at: Utc::now(),
        });
    }
}
