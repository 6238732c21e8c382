//! Read side of a session.
//!
//! After every facade operation the session publishes an immutable
//! [`SessionSnapshot`]. Readers on other threads see either the previous or
//! the next snapshot, never a half-applied call. The registry and buffer
//! directory are persistent maps, so publishing shares structure instead of
//! copying.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use quassel_proto::{BufferId, IdentityId, NetworkId, TypeTag};
use uuid::Uuid;

use crate::buffers::BufferDirectory;
use crate::error::SyncResult;
use crate::model::{Buffer, Identity, IrcChannel, Network, SyncObject};
use crate::phase::ConnectionPhase;
use crate::registry::ObjectRegistry;

/// Point-in-time view of a session.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub session_id: Option<Uuid>,
    pub phase: ConnectionPhase,
    pub registry: ObjectRegistry,
    pub buffers: BufferDirectory,
    pub latency_ms: Option<u64>,
    pub pending_init: usize,
    pub pending_backlog: usize,
    pub taken_at: DateTime<Utc>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            session_id: None,
            phase: ConnectionPhase::Disconnected,
            registry: ObjectRegistry::new(),
            buffers: BufferDirectory::new(),
            latency_ms: None,
            pending_init: 0,
            pending_backlog: 0,
            taken_at: Utc::now(),
        }
    }
}

impl SessionSnapshot {
    pub fn lookup(&self, tag: TypeTag, name: &str) -> SyncResult<SyncObject> {
        self.registry.lookup(tag, name)
    }

    pub fn network(&self, id: NetworkId) -> Option<&Network> {
        self.registry.networks().get(id)
    }

    pub fn identity(&self, id: IdentityId) -> Option<&Identity> {
        self.registry.identities().get(id)
    }

    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(id)
    }

    pub fn buffers_by_network(&self, network: NetworkId) -> impl Iterator<Item = &Buffer> {
        self.buffers.list_by_network(network)
    }

    /// Owning network of a buffer, resolved by id.
    pub fn network_for_buffer(&self, id: BufferId) -> Option<&Network> {
        self.network(self.buffer(id)?.network_id())
    }

    /// Channel shown in a channel buffer, resolved by name.
    pub fn channel_for_buffer(&self, id: BufferId) -> Option<&IrcChannel> {
        match self.buffer(id)? {
            Buffer::Channel(info) => self.registry.channel(info.network_id, &info.name),
            _ => None,
        }
    }
}

/// Cloneable read handle. `Send + Sync`, usable from any thread.
#[derive(Clone)]
pub struct SessionReader {
    shared: Arc<RwLock<Arc<SessionSnapshot>>>,
}

impl SessionReader {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(RwLock::new(Arc::new(SessionSnapshot::default()))),
        }
    }

    pub(crate) fn publish(&self, snapshot: SessionSnapshot) {
        *self.shared.write() = Arc::new(snapshot);
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::clone(&self.shared.read())
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.shared.read().phase
    }

    pub fn latency(&self) -> Option<u64> {
        self.shared.read().latency_ms
    }

    pub fn lookup(&self, tag: TypeTag, name: &str) -> SyncResult<SyncObject> {
        self.snapshot().lookup(tag, name)
    }

    pub fn network(&self, id: NetworkId) -> Option<Network> {
        self.snapshot().network(id).cloned()
    }

    pub fn identity(&self, id: IdentityId) -> Option<Identity> {
        self.snapshot().identity(id).cloned()
    }

    pub fn buffer(&self, id: BufferId) -> Option<Buffer> {
        self.snapshot().buffer(id).cloned()
    }

    pub fn buffers_by_network(&self, network: NetworkId) -> Vec<Buffer> {
        self.snapshot().buffers_by_network(network).cloned().collect()
    }

    pub fn channel_for_buffer(&self, id: BufferId) -> Option<IrcChannel> {
        self.snapshot().channel_for_buffer(id).cloned()
    }
}
