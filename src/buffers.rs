//! Buffer directory.
//!
//! Descriptors are accepted at any time, but a [`Buffer`] is only built once
//! its owning network is registered. Descriptors whose network is still
//! missing stay pending until a later materialization pass.

use im::OrdMap;
use quassel_proto::{BufferId, BufferInfo, NetworkId};
use tracing::{debug, warn};

use crate::model::Buffer;
use crate::registry::NetworkDirectory;

/// What [`BufferDirectory::update`] did with a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUpdate {
    /// An existing buffer took the new descriptor.
    Refreshed,
    /// The descriptor is stored and waits for materialization.
    Pending,
    /// The buffer existed but its new kind is not modelled; it was dropped.
    Dropped,
}

#[derive(Clone, Debug, Default)]
pub struct BufferDirectory {
    pending: OrdMap<BufferId, BufferInfo>,
    buffers: OrdMap<BufferId, Buffer>,
}

impl BufferDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store descriptors without building buffers.
    pub fn seed(&mut self, infos: impl IntoIterator<Item = BufferInfo>) {
        for info in infos {
            self.pending.insert(info.id, info);
        }
    }

    /// Build every pending buffer whose network now exists.
    ///
    /// Descriptors of unmodelled kinds are logged and discarded. Returns the
    /// ids built by this call; repeated calls never build a buffer twice.
    pub fn materialize_all(&mut self, networks: &NetworkDirectory) -> Vec<BufferId> {
        let ready: Vec<BufferId> = self
            .pending
            .values()
            .filter(|info| networks.contains(info.network_id))
            .map(|info| info.id)
            .collect();
        ready
            .into_iter()
            .filter(|id| self.materialize(*id, networks))
            .collect()
    }

    /// Build one pending buffer if its network exists.
    pub fn materialize(&mut self, id: BufferId, networks: &NetworkDirectory) -> bool {
        let Some(info) = self.pending.get(&id) else {
            return false;
        };
        let Some(network) = networks.get(info.network_id) else {
            return false;
        };
        let Some(info) = self.pending.remove(&id) else {
            return false;
        };
        match Buffer::new(info, network) {
            Ok(buffer) => {
                debug!(buffer = %id, network = %buffer.network_id(), name = %buffer.name(), "Materialized buffer");
                self.buffers.insert(id, buffer);
                true
            }
            Err(e) => {
                warn!(buffer = %id, error = %e, "Skipping buffer");
                false
            }
        }
    }

    /// Refresh a descriptor in place, or store it as pending if unseen.
    ///
    /// A buffer moved to a network that is not registered goes back to
    /// pending until that network appears.
    pub fn update(&mut self, info: BufferInfo, networks: &NetworkDirectory) -> BufferUpdate {
        let id = info.id;
        let Some(buffer) = self.buffers.get_mut(&id) else {
            self.pending.insert(id, info);
            return BufferUpdate::Pending;
        };
        if info.network_id != buffer.network_id() && !networks.contains(info.network_id) {
            debug!(buffer = %id, network = %info.network_id, "Buffer moved to unknown network");
            self.buffers.remove(&id);
            self.pending.insert(id, info);
            return BufferUpdate::Pending;
        }
        match buffer.refresh(info) {
            Ok(()) => BufferUpdate::Refreshed,
            Err(e) => {
                warn!(buffer = %id, error = %e, "Dropping buffer after kind change");
                self.buffers.remove(&id);
                BufferUpdate::Dropped
            }
        }
    }

    /// Rename a buffer, pending or materialized. Returns whether it was known.
    pub fn rename(&mut self, id: BufferId, name: &str) -> bool {
        if let Some(buffer) = self.buffers.get_mut(&id) {
            buffer.rename(name);
            return true;
        }
        if let Some(info) = self.pending.get_mut(&id) {
            info.name = name.to_string();
            return true;
        }
        false
    }

    /// Forget a buffer. Returns whether anything was known under `id`.
    pub fn remove(&mut self, id: BufferId) -> bool {
        let built = self.buffers.remove(&id).is_some();
        let pending = self.pending.remove(&id).is_some();
        built || pending
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(&id)
    }

    pub fn list_by_network(&self, network: NetworkId) -> impl Iterator<Item = &Buffer> {
        self.buffers
            .values()
            .filter(move |buffer| buffer.network_id() == network)
    }

    /// Ids of every materialized buffer, ascending.
    pub fn ids(&self) -> Vec<BufferId> {
        self.buffers.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.values()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.buffers.clear();
    }
}
