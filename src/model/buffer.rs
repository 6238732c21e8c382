//! Buffer replicas.

use quassel_proto::{BufferId, BufferInfo, BufferKind, NetworkId, TypeTag};

use super::network::Network;
use crate::error::SyncError;

/// A materialized buffer.
///
/// Holds only its descriptor. The owning network and the channel of a
/// channel buffer are looked up by id whenever they are needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Buffer {
    Status(BufferInfo),
    Channel(BufferInfo),
    Query(BufferInfo),
}

impl Buffer {
    /// Build a buffer for `info`, which must belong to `network`.
    pub fn new(info: BufferInfo, network: &Network) -> Result<Self, SyncError> {
        if info.network_id != network.id() {
            return Err(SyncError::not_found(
                TypeTag::Network,
                &info.network_id.to_string(),
            ));
        }
        Self::from_kind(info)
    }

    fn from_kind(info: BufferInfo) -> Result<Self, SyncError> {
        match info.kind {
            BufferKind::Status => Ok(Self::Status(info)),
            BufferKind::Channel => Ok(Self::Channel(info)),
            BufferKind::Query => Ok(Self::Query(info)),
            BufferKind::Group | BufferKind::Unknown(_) => Err(SyncError::UnsupportedType(
                format!("buffer kind {:#04x}", info.kind.code()),
            )),
        }
    }

    pub fn info(&self) -> &BufferInfo {
        match self {
            Self::Status(info) | Self::Channel(info) | Self::Query(info) => info,
        }
    }

    pub fn id(&self) -> BufferId {
        self.info().id
    }

    pub fn network_id(&self) -> NetworkId {
        self.info().network_id
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// Scoped channel name for channel buffers.
    pub fn channel_key(&self) -> Option<String> {
        match self {
            Self::Channel(info) => Some(format!("{}/{}", info.network_id, info.name)),
            _ => None,
        }
    }

    /// Replace the descriptor. A changed kind changes the variant.
    pub(crate) fn refresh(&mut self, info: BufferInfo) -> Result<(), SyncError> {
        *self = Self::from_kind(info)?;
        Ok(())
    }

    pub(crate) fn rename(&mut self, name: &str) {
        match self {
            Self::Status(info) | Self::Channel(info) | Self::Query(info) => {
                info.name = name.to_string();
            }
        }
    }
}
