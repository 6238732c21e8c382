//! Buffer descriptors.

use crate::ids::{BufferId, NetworkId};

/// Kind of a buffer, encoded by the core as a bit flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u16", into = "u16"))]
pub enum BufferKind {
    /// Network status window.
    Status,
    /// Channel window.
    Channel,
    /// Private conversation with a single nick.
    Query,
    /// Buffer group (not rendered as a chat).
    Group,
    /// Any code this client does not know.
    Unknown(u16),
}

impl BufferKind {
    /// Wire code of this kind.
    pub fn code(&self) -> u16 {
        match self {
            BufferKind::Status => 0x01,
            BufferKind::Channel => 0x02,
            BufferKind::Query => 0x04,
            BufferKind::Group => 0x08,
            BufferKind::Unknown(code) => *code,
        }
    }
}

impl From<u16> for BufferKind {
    fn from(code: u16) -> Self {
        match code {
            0x01 => BufferKind::Status,
            0x02 => BufferKind::Channel,
            0x04 => BufferKind::Query,
            0x08 => BufferKind::Group,
            other => BufferKind::Unknown(other),
        }
    }
}

impl From<BufferKind> for u16 {
    fn from(kind: BufferKind) -> Self {
        kind.code()
    }
}

/// Immutable buffer descriptor pushed by the core.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferInfo {
    /// Buffer id.
    pub id: BufferId,
    /// Owning network.
    pub network_id: NetworkId,
    /// Buffer kind.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: BufferKind,
    /// Group id, zero when ungrouped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group_id: i32,
    /// Channel name, nick, or empty for status buffers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
}

impl BufferInfo {
    /// Build a descriptor with no group.
    pub fn new(id: BufferId, network_id: NetworkId, kind: BufferKind, name: impl Into<String>) -> Self {
        Self {
            id,
            network_id,
            kind,
            group_id: 0,
            name: name.into(),
        }
    }
}
