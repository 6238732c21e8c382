//! Session state handed over once the core accepts the login.

use crate::buffer::BufferInfo;
use crate::ids::NetworkId;
use crate::value::FieldMap;

/// Snapshot of what the core knows at login time.
///
/// Consumed once to seed the directories, then discarded.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    /// Networks configured on the core.
    #[cfg_attr(feature = "serde", serde(default))]
    pub network_ids: Vec<NetworkId>,
    /// Full property maps of every identity. Each carries its `identityId`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub identities: Vec<FieldMap>,
    /// Every buffer the core stores.
    #[cfg_attr(feature = "serde", serde(default))]
    pub buffer_infos: Vec<BufferInfo>,
}
