//! Network directory.

use im::OrdMap;
use quassel_proto::NetworkId;

use crate::model::Network;

/// Owns every network replica, created and removed on core notification.
#[derive(Clone, Debug, Default)]
pub struct NetworkDirectory {
    networks: OrdMap<NetworkId, Network>,
}

impl NetworkDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an uninitialized network. Returns `false` if it already exists.
    pub fn create(&mut self, id: NetworkId) -> bool {
        if self.networks.contains_key(&id) {
            return false;
        }
        self.networks.insert(id, Network::new(id));
        true
    }

    pub(crate) fn insert(&mut self, network: Network) {
        self.networks.insert(network.id(), network);
    }

    pub fn remove(&mut self, id: NetworkId) -> Option<Network> {
        self.networks.remove(&id)
    }

    pub fn get(&self, id: NetworkId) -> Option<&Network> {
        self.networks.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NetworkId) -> Option<&mut Network> {
        self.networks.get_mut(&id)
    }

    pub fn contains(&self, id: NetworkId) -> bool {
        self.networks.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<NetworkId> {
        self.networks.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
