//! Object identifiers.
//!
//! Every syncable object is addressed by a `(type tag, name)` pair. Names of
//! objects that live inside a network are composite: `"<networkId>/<child>"`,
//! for example `"1/#quassel"` for a channel or `"1/nick"` for a user.
//!
//! The string `"<TypeTag>:<name>"` ([`InitKey`]) is the join key between an
//! init request that was sent and a mutation that arrived before its reply.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtoError;
use crate::ids::NetworkId;

/// Separator between the parent network id and the child name.
pub const SCOPE_SEPARATOR: char = '/';

/// Kinds of syncable objects this client mirrors.
///
/// The set is closed: a tag outside it parses to [`ProtoError::UnknownType`]
/// so that callers can log and skip calls for object kinds added by newer
/// cores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeTag {
    /// Global alias list.
    AliasManager,
    /// Backlog fetch endpoint.
    BacklogManager,
    /// Per-buffer read markers and activity.
    BufferSyncer,
    /// One configured buffer view (chat list).
    BufferViewConfig,
    /// Registry of buffer views.
    BufferViewManager,
    /// Core version and uptime information.
    CoreInfo,
    /// A nick/realname identity.
    Identity,
    /// Global ignore rules.
    IgnoreListManager,
    /// A channel inside a network.
    IrcChannel,
    /// A user inside a network.
    IrcUser,
    /// A configured IRC network.
    Network,
    /// Global network settings (ping, auto-WHO).
    NetworkConfig,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 12] = [
        TypeTag::AliasManager,
        TypeTag::BacklogManager,
        TypeTag::BufferSyncer,
        TypeTag::BufferViewConfig,
        TypeTag::BufferViewManager,
        TypeTag::CoreInfo,
        TypeTag::Identity,
        TypeTag::IgnoreListManager,
        TypeTag::IrcChannel,
        TypeTag::IrcUser,
        TypeTag::Network,
        TypeTag::NetworkConfig,
    ];

    /// The tag as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::AliasManager => "AliasManager",
            TypeTag::BacklogManager => "BacklogManager",
            TypeTag::BufferSyncer => "BufferSyncer",
            TypeTag::BufferViewConfig => "BufferViewConfig",
            TypeTag::BufferViewManager => "BufferViewManager",
            TypeTag::CoreInfo => "CoreInfo",
            TypeTag::Identity => "Identity",
            TypeTag::IgnoreListManager => "IgnoreListManager",
            TypeTag::IrcChannel => "IrcChannel",
            TypeTag::IrcUser => "IrcUser",
            TypeTag::Network => "Network",
            TypeTag::NetworkConfig => "NetworkConfig",
        }
    }

    /// Whether names of this type are `"<networkId>/<child>"` composites.
    pub fn is_scoped(&self) -> bool {
        matches!(self, TypeTag::IrcChannel | TypeTag::IrcUser)
    }

    /// Whether at most one object of this type exists per session.
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            TypeTag::AliasManager
                | TypeTag::BacklogManager
                | TypeTag::BufferSyncer
                | TypeTag::BufferViewManager
                | TypeTag::CoreInfo
                | TypeTag::IgnoreListManager
                | TypeTag::NetworkConfig
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownType(s.to_string()))
    }
}

/// Split a composite `"<networkId>/<child>"` name on its first separator.
///
/// The child part may itself contain the separator; only the first one
/// delimits the parent.
pub fn split_scoped(name: &str) -> Result<(NetworkId, &str), ProtoError> {
    let (parent, child) = name
        .split_once(SCOPE_SEPARATOR)
        .ok_or_else(|| ProtoError::malformed(name, "missing '/' separator"))?;
    let network = parent
        .parse::<NetworkId>()
        .map_err(|_| ProtoError::malformed(name, "parent is not a network id"))?;
    if child.is_empty() {
        return Err(ProtoError::malformed(name, "empty child name"));
    }
    Ok((network, child))
}

/// Parse a plain numeric object name (networks, identities, buffer views).
pub fn parse_id<T: FromStr>(name: &str) -> Result<T, ProtoError> {
    name.parse::<T>()
        .map_err(|_| ProtoError::malformed(name, "expected a numeric id"))
}

/// Join key `"<TypeTag>:<name>"` shared by init tracking and deferred mutations.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InitKey(String);

impl InitKey {
    /// Build the key for an object.
    pub fn new(tag: TypeTag, name: &str) -> Self {
        InitKey(format!("{}:{}", tag.as_str(), name))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
