//! Channels and users, owned by their [`Network`](super::Network).

use std::collections::BTreeMap;

use quassel_proto::{FieldMap, NetworkId, TypeTag, Value};

use super::syncable::{Properties, impl_syncable};

/// A channel on a network. Filed as `"<networkId>/<channel>"`.
#[derive(Clone, Debug, PartialEq)]
pub struct IrcChannel {
    network: NetworkId,
    name: String,
    state: Properties,
    /// Nick to mode letters.
    members: BTreeMap<String, String>,
}

impl_syncable!(IrcChannel, TypeTag::IrcChannel, |c| format!("{}/{}", c.network, c.name), refresh = IrcChannel::rebuild);

impl IrcChannel {
    pub fn new(network: NetworkId, name: &str) -> Self {
        Self {
            network,
            name: name.to_string(),
            state: Properties::default(),
            members: BTreeMap::new(),
        }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topic(&self) -> Option<&str> {
        self.state.fields.get("topic").and_then(Value::as_str)
    }

    /// Mode letters of a member, `None` if not joined.
    pub fn member_modes(&self, nick: &str) -> Option<&str> {
        self.members.get(nick).map(String::as_str)
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members.iter().map(|(n, m)| (n.as_str(), m.as_str()))
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.state.fields.insert("name".to_string(), Value::from(name));
    }

    pub(crate) fn set_network(&mut self, network: NetworkId) {
        self.network = network;
    }

    /// Move a member's modes to its new nick. Returns whether it was joined.
    pub(crate) fn rename_member(&mut self, old_nick: &str, new_nick: &str) -> bool {
        let Some(modes) = self.members.remove(old_nick) else {
            return false;
        };
        if let Some(Value::Map(user_modes)) = self.state.fields.get_mut("UserModes") {
            user_modes.remove(old_nick);
            user_modes.insert(new_nick.to_string(), Value::from(modes.as_str()));
        }
        self.members.insert(new_nick.to_string(), modes);
        true
    }

    fn rebuild(&mut self, changed: &FieldMap) {
        if let Some(user_modes) = changed.get("UserModes").and_then(Value::as_map) {
            self.members = user_modes
                .iter()
                .map(|(nick, modes)| {
                    (nick.clone(), modes.as_str().unwrap_or_default().to_string())
                })
                .collect();
        }
    }
}

/// A user seen on a network. Filed as `"<networkId>/<nick>"`.
#[derive(Clone, Debug, PartialEq)]
pub struct IrcUser {
    network: NetworkId,
    nick: String,
    state: Properties,
}

impl_syncable!(IrcUser, TypeTag::IrcUser, |u| format!("{}/{}", u.network, u.nick));

impl IrcUser {
    pub fn new(network: NetworkId, nick: &str) -> Self {
        Self {
            network,
            nick: nick.to_string(),
            state: Properties::default(),
        }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn away(&self) -> bool {
        self.state
            .fields
            .get("away")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub(crate) fn set_nick(&mut self, nick: &str) {
        self.nick = nick.to_string();
        self.state.fields.insert("nick".to_string(), Value::from(nick));
    }

    pub(crate) fn set_network(&mut self, network: NetworkId) {
        self.network = network;
    }
}
