//! Local replicas of core-owned objects.
//!
//! Every replica implements [`Syncable`]. [`SyncObject`] is the closed set of
//! replicas the registry can hold, and [`SyncObject::construct`] is the only
//! place a type tag is turned into a fresh replica.

mod alias;
mod buffer;
mod identity;
mod ignore;
mod irc;
mod network;
mod properties;
mod syncable;

pub use alias::{Alias, AliasManager};
pub use buffer::Buffer;
pub use identity::Identity;
pub use ignore::{IgnoreListManager, IgnoreRule, IgnoreType, Scope, Strictness};
pub use irc::{IrcChannel, IrcUser};
pub use network::Network;
pub use properties::{
    BacklogManager, BufferSyncer, BufferViewConfig, BufferViewManager, CoreInfo, NetworkConfig,
};
pub use syncable::{Properties, Syncable};

use quassel_proto::{parse_id, split_scoped, TypeTag};

use crate::error::SyncError;

/// Any replica the registry can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncObject {
    AliasManager(AliasManager),
    BacklogManager(BacklogManager),
    BufferSyncer(BufferSyncer),
    BufferViewConfig(BufferViewConfig),
    BufferViewManager(BufferViewManager),
    CoreInfo(CoreInfo),
    Identity(Identity),
    IgnoreListManager(IgnoreListManager),
    IrcChannel(IrcChannel),
    IrcUser(IrcUser),
    Network(Network),
    NetworkConfig(NetworkConfig),
}

impl SyncObject {
    /// Fresh, uninitialized replica for `(tag, name)`.
    pub fn construct(tag: TypeTag, name: &str) -> Result<Self, SyncError> {
        let object = match tag {
            TypeTag::AliasManager => Self::AliasManager(AliasManager::new(name)),
            TypeTag::BacklogManager => Self::BacklogManager(BacklogManager::new(name)),
            TypeTag::BufferSyncer => Self::BufferSyncer(BufferSyncer::new(name)),
            TypeTag::BufferViewConfig => Self::BufferViewConfig(BufferViewConfig::new(parse_id(name)?)),
            TypeTag::BufferViewManager => Self::BufferViewManager(BufferViewManager::new(name)),
            TypeTag::CoreInfo => Self::CoreInfo(CoreInfo::new(name)),
            TypeTag::Identity => Self::Identity(Identity::new(parse_id(name)?)),
            TypeTag::IgnoreListManager => Self::IgnoreListManager(IgnoreListManager::new(name)),
            TypeTag::IrcChannel => {
                let (network, channel) = split_scoped(name)?;
                Self::IrcChannel(IrcChannel::new(network, channel))
            }
            TypeTag::IrcUser => {
                let (network, nick) = split_scoped(name)?;
                Self::IrcUser(IrcUser::new(network, nick))
            }
            TypeTag::Network => Self::Network(Network::new(parse_id(name)?)),
            TypeTag::NetworkConfig => Self::NetworkConfig(NetworkConfig::new(name)),
        };
        Ok(object)
    }

    pub fn as_syncable(&self) -> &dyn Syncable {
        match self {
            Self::AliasManager(o) => o,
            Self::BacklogManager(o) => o,
            Self::BufferSyncer(o) => o,
            Self::BufferViewConfig(o) => o,
            Self::BufferViewManager(o) => o,
            Self::CoreInfo(o) => o,
            Self::Identity(o) => o,
            Self::IgnoreListManager(o) => o,
            Self::IrcChannel(o) => o,
            Self::IrcUser(o) => o,
            Self::Network(o) => o,
            Self::NetworkConfig(o) => o,
        }
    }

    pub fn as_syncable_mut(&mut self) -> &mut dyn Syncable {
        match self {
            Self::AliasManager(o) => o,
            Self::BacklogManager(o) => o,
            Self::BufferSyncer(o) => o,
            Self::BufferViewConfig(o) => o,
            Self::BufferViewManager(o) => o,
            Self::CoreInfo(o) => o,
            Self::Identity(o) => o,
            Self::IgnoreListManager(o) => o,
            Self::IrcChannel(o) => o,
            Self::IrcUser(o) => o,
            Self::Network(o) => o,
            Self::NetworkConfig(o) => o,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.as_syncable().type_tag()
    }

    pub fn object_name(&self) -> String {
        self.as_syncable().object_name()
    }

    /// Rename a singleton in place. Other kinds are re-keyed by the registry.
    pub(crate) fn set_singleton_name(&mut self, name: &str) {
        match self {
            Self::AliasManager(o) => o.set_name(name),
            Self::BacklogManager(o) => o.set_name(name),
            Self::BufferSyncer(o) => o.set_name(name),
            Self::BufferViewManager(o) => o.set_name(name),
            Self::CoreInfo(o) => o.set_name(name),
            Self::IgnoreListManager(o) => o.set_name(name),
            Self::NetworkConfig(o) => o.set_name(name),
            Self::BufferViewConfig(_)
            | Self::Identity(_)
            | Self::IrcChannel(_)
            | Self::IrcUser(_)
            | Self::Network(_) => {}
        }
    }
}
