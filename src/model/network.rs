//! Network replica and its channel/user children.
//!
//! Children are keyed by channel name and nick. Their initial state usually
//! arrives inside the network itself, under the reserved
//! `IrcUsersAndChannels` property, rather than as separate init responses.

use im::OrdMap;
use quassel_proto::{FieldMap, NetworkId, TypeTag, Value};
use tracing::{debug, warn};

use super::irc::{IrcChannel, IrcUser};
use super::syncable::{Properties, Syncable, impl_syncable};

const CHILDREN_KEY: &str = "IrcUsersAndChannels";

#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    id: NetworkId,
    state: Properties,
    channels: OrdMap<String, IrcChannel>,
    users: OrdMap<String, IrcUser>,
}

impl_syncable!(Network, TypeTag::Network, |n| n.id.to_string(), refresh = Network::absorb_children);

impl Network {
    pub fn new(id: NetworkId) -> Self {
        Self {
            id,
            state: Properties::default(),
            channels: OrdMap::new(),
            users: OrdMap::new(),
        }
    }

    pub fn id(&self) -> NetworkId {
        self.id
    }

    pub fn network_name(&self) -> Option<&str> {
        self.state.fields.get("networkName").and_then(Value::as_str)
    }

    pub fn my_nick(&self) -> Option<&str> {
        self.state.fields.get("myNick").and_then(Value::as_str)
    }

    pub fn is_connected(&self) -> bool {
        self.state
            .fields
            .get("isConnected")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn channel(&self, name: &str) -> Option<&IrcChannel> {
        self.channels.get(name)
    }

    pub fn user(&self, nick: &str) -> Option<&IrcUser> {
        self.users.get(nick)
    }

    pub fn channels(&self) -> impl Iterator<Item = &IrcChannel> {
        self.channels.values()
    }

    pub fn users(&self) -> impl Iterator<Item = &IrcUser> {
        self.users.values()
    }

    pub(crate) fn channel_mut(&mut self, name: &str) -> Option<&mut IrcChannel> {
        self.channels.get_mut(name)
    }

    pub(crate) fn user_mut(&mut self, nick: &str) -> Option<&mut IrcUser> {
        self.users.get_mut(nick)
    }

    pub(crate) fn insert_channel(&mut self, channel: IrcChannel) {
        self.channels.insert(channel.name().to_string(), channel);
    }

    pub(crate) fn insert_user(&mut self, user: IrcUser) {
        self.users.insert(user.nick().to_string(), user);
    }

    /// Re-key a channel. Returns `false` if it does not exist or `new` is taken.
    pub(crate) fn rename_channel(&mut self, old: &str, new: &str) -> bool {
        if old != new && self.channels.contains_key(new) {
            return false;
        }
        let Some(mut channel) = self.channels.remove(old) else {
            return false;
        };
        channel.set_name(new);
        self.channels.insert(new.to_string(), channel);
        true
    }

    /// Re-key a user and follow the nick change in every channel it joined.
    ///
    /// Returns `false` if the user does not exist or `new` is taken.
    pub(crate) fn rename_user(&mut self, old: &str, new: &str) -> bool {
        if old != new && self.users.contains_key(new) {
            return false;
        }
        let Some(mut user) = self.users.remove(old) else {
            return false;
        };
        user.set_nick(new);
        self.users.insert(new.to_string(), user);

        let joined: Vec<String> = self
            .channels
            .iter()
            .filter(|(_, channel)| channel.member_modes(old).is_some())
            .map(|(name, _)| name.clone())
            .collect();
        for name in joined {
            if let Some(channel) = self.channels.get_mut(&name) {
                channel.rename_member(old, new);
            }
        }
        true
    }

    pub(crate) fn set_id(&mut self, id: NetworkId) {
        self.id = id;
        self.channels = self
            .channels
            .iter()
            .map(|(name, channel)| {
                let mut channel = channel.clone();
                channel.set_network(id);
                (name.clone(), channel)
            })
            .collect();
        self.users = self
            .users
            .iter()
            .map(|(nick, user)| {
                let mut user = user.clone();
                user.set_network(id);
                (nick.clone(), user)
            })
            .collect();
    }

    /// Scoped names (`"<id>/<child>"`) of every child, for deferred replay.
    pub(crate) fn child_names(&self) -> Vec<(TypeTag, String)> {
        self.channels
            .values()
            .map(|c| (TypeTag::IrcChannel, c.object_name()))
            .chain(self.users.values().map(|u| (TypeTag::IrcUser, u.object_name())))
            .collect()
    }

    fn absorb_children(&mut self, changed: &FieldMap) {
        let Some(children) = changed.get(CHILDREN_KEY).and_then(Value::as_map) else {
            return;
        };
        self.state.fields.remove(CHILDREN_KEY);

        for fields in child_maps(children.get("Users")) {
            let Some(nick) = fields.get("nick").and_then(Value::as_str).map(str::to_string) else {
                warn!(network = %self.id, "User entry without nick, skipping");
                continue;
            };
            match self.users.get_mut(&nick) {
                Some(user) => user.apply(fields),
                None => {
                    let mut user = IrcUser::new(self.id, &nick);
                    user.init(fields);
                    self.users.insert(nick, user);
                }
            }
        }

        for fields in child_maps(children.get("Channels")) {
            let Some(name) = fields.get("name").and_then(Value::as_str).map(str::to_string) else {
                warn!(network = %self.id, "Channel entry without name, skipping");
                continue;
            };
            match self.channels.get_mut(&name) {
                Some(channel) => channel.apply(fields),
                None => {
                    let mut channel = IrcChannel::new(self.id, &name);
                    channel.init(fields);
                    self.channels.insert(name, channel);
                }
            }
        }

        debug!(
            network = %self.id,
            users = self.users.len(),
            channels = self.channels.len(),
            "Absorbed network children"
        );
    }
}

/// Children arrive either as a list of maps or as a map keyed by name.
fn child_maps(value: Option<&Value>) -> Vec<FieldMap> {
    match value {
        Some(Value::List(items)) => items.iter().filter_map(Value::as_map).cloned().collect(),
        Some(Value::Map(by_name)) => by_name.values().filter_map(Value::as_map).cloned().collect(),
        _ => Vec::new(),
    }
}
