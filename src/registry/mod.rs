//! Object registry.
//!
//! Maps `(type tag, name)` to the replica that owns that identity. Networks
//! and identities live in their own directories; channels and users live
//! inside their network and are reached through the scoped name
//! `"<networkId>/<child>"`; singletons are filed by type tag and name.
//!
//! All maps are persistent (`im`), so cloning a registry for a read snapshot
//! is constant time.

mod identities;
mod networks;

pub use identities::IdentityDirectory;
pub use networks::NetworkDirectory;

use im::OrdMap;
use quassel_proto::{parse_id, split_scoped, FieldMap, IdentityId, NetworkId, TypeTag};
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use crate::model::{BufferViewConfig, BufferViewManager, IrcChannel, SyncObject, Syncable};

#[derive(Clone, Debug)]
pub struct ObjectRegistry {
    networks: NetworkDirectory,
    identities: IdentityDirectory,
    buffer_views: OrdMap<i32, BufferViewConfig>,
    singletons: OrdMap<(TypeTag, String), SyncObject>,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    /// Empty registry holding only the backlog manager, which needs no init.
    pub fn new() -> Self {
        let mut singletons = OrdMap::new();
        singletons.insert(
            (TypeTag::BacklogManager, String::new()),
            SyncObject::BacklogManager(crate::model::BacklogManager::new("")),
        );
        Self {
            networks: NetworkDirectory::new(),
            identities: IdentityDirectory::new(),
            buffer_views: OrdMap::new(),
            singletons,
        }
    }

    /// File `object` under its own identity, replacing any previous holder.
    ///
    /// Channels and users need their network to exist.
    pub fn register(&mut self, object: SyncObject) -> SyncResult {
        match object {
            SyncObject::Network(network) => self.networks.insert(network),
            SyncObject::Identity(identity) => self.identities.insert(identity),
            SyncObject::BufferViewConfig(view) => {
                self.buffer_views.insert(view.id(), view);
            }
            SyncObject::IrcChannel(channel) => {
                let network = self.network_mut(channel.network())?;
                network.insert_channel(channel);
            }
            SyncObject::IrcUser(user) => {
                let network = self.network_mut(user.network())?;
                network.insert_user(user);
            }
            singleton => {
                let key = (singleton.type_tag(), singleton.object_name());
                self.singletons.insert(key, singleton);
            }
        }
        Ok(())
    }

    /// Resolve an object for reading.
    pub fn resolve(&self, tag: TypeTag, name: &str) -> SyncResult<&dyn Syncable> {
        let found: Option<&dyn Syncable> = match tag {
            TypeTag::Network => self
                .networks
                .get(parse_id(name)?)
                .map(|n| n as &dyn Syncable),
            TypeTag::Identity => self
                .identities
                .get(parse_id(name)?)
                .map(|i| i as &dyn Syncable),
            TypeTag::BufferViewConfig => self
                .buffer_views
                .get(&parse_id::<i32>(name)?)
                .map(|v| v as &dyn Syncable),
            TypeTag::IrcChannel => {
                let (network, channel) = split_scoped(name)?;
                self.networks
                    .get(network)
                    .and_then(|n| n.channel(channel))
                    .map(|c| c as &dyn Syncable)
            }
            TypeTag::IrcUser => {
                let (network, nick) = split_scoped(name)?;
                self.networks
                    .get(network)
                    .and_then(|n| n.user(nick))
                    .map(|u| u as &dyn Syncable)
            }
            _ => self
                .singletons
                .get(&(tag, name.to_string()))
                .map(SyncObject::as_syncable),
        };
        found.ok_or_else(|| SyncError::not_found(tag, name))
    }

    /// Resolve an object for mutation. Only the dispatch path may do this.
    pub(crate) fn resolve_mut(&mut self, tag: TypeTag, name: &str) -> SyncResult<&mut dyn Syncable> {
        let found: Option<&mut dyn Syncable> = match tag {
            TypeTag::Network => self
                .networks
                .get_mut(parse_id(name)?)
                .map(|n| n as &mut dyn Syncable),
            TypeTag::Identity => self
                .identities
                .get_mut(parse_id(name)?)
                .map(|i| i as &mut dyn Syncable),
            TypeTag::BufferViewConfig => self
                .buffer_views
                .get_mut(&parse_id::<i32>(name)?)
                .map(|v| v as &mut dyn Syncable),
            TypeTag::IrcChannel => {
                let (network, channel) = split_scoped(name)?;
                self.networks
                    .get_mut(network)
                    .and_then(|n| n.channel_mut(channel))
                    .map(|c| c as &mut dyn Syncable)
            }
            TypeTag::IrcUser => {
                let (network, nick) = split_scoped(name)?;
                self.networks
                    .get_mut(network)
                    .and_then(|n| n.user_mut(nick))
                    .map(|u| u as &mut dyn Syncable)
            }
            _ => self
                .singletons
                .get_mut(&(tag, name.to_string()))
                .map(SyncObject::as_syncable_mut),
        };
        found.ok_or_else(|| SyncError::not_found(tag, name))
    }

    /// Owned copy of an object, for readers outside the dispatch path.
    pub fn lookup(&self, tag: TypeTag, name: &str) -> SyncResult<SyncObject> {
        let found = match tag {
            TypeTag::Network => self
                .networks
                .get(parse_id(name)?)
                .cloned()
                .map(SyncObject::Network),
            TypeTag::Identity => self
                .identities
                .get(parse_id(name)?)
                .cloned()
                .map(SyncObject::Identity),
            TypeTag::BufferViewConfig => self
                .buffer_views
                .get(&parse_id::<i32>(name)?)
                .cloned()
                .map(SyncObject::BufferViewConfig),
            TypeTag::IrcChannel => {
                let (network, channel) = split_scoped(name)?;
                self.channel(network, channel).cloned().map(SyncObject::IrcChannel)
            }
            TypeTag::IrcUser => {
                let (network, nick) = split_scoped(name)?;
                self.networks
                    .get(network)
                    .and_then(|n| n.user(nick))
                    .cloned()
                    .map(SyncObject::IrcUser)
            }
            _ => self.singletons.get(&(tag, name.to_string())).cloned(),
        };
        found.ok_or_else(|| SyncError::not_found(tag, name))
    }

    /// Populate an object from its init response, creating it if needed.
    ///
    /// Channels and users can only be created inside an existing network.
    pub fn initialize(&mut self, tag: TypeTag, name: &str, fields: FieldMap) -> SyncResult {
        match self.resolve_mut(tag, name) {
            Ok(object) => {
                object.init(fields);
                Ok(())
            }
            Err(SyncError::NotFound { .. }) => {
                let mut object = SyncObject::construct(tag, name)?;
                object.as_syncable_mut().init(fields);
                self.register(object)
            }
            Err(err) => Err(err),
        }
    }

    /// Move an object to a new name, keeping the instance.
    ///
    /// A missing `old_name` means the registry has diverged from the core and
    /// is reported as [`SyncError::RenameTargetMissing`].
    pub fn rename(&mut self, tag: TypeTag, old_name: &str, new_name: &str) -> SyncResult {
        match self.resolve(tag, old_name) {
            Ok(_) => {}
            Err(SyncError::NotFound { .. }) => {
                return Err(SyncError::RenameTargetMissing {
                    type_tag: tag,
                    old_name: old_name.to_string(),
                    new_name: new_name.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.resolve(tag, new_name).is_ok() {
            warn!(type_tag = %tag, old = %old_name, new = %new_name, "Rename target already taken");
            return Err(SyncError::MalformedIdentifier {
                name: new_name.to_string(),
                reason: "rename target exists",
            });
        }

        match tag {
            TypeTag::Network => {
                let old: NetworkId = parse_id(old_name)?;
                let new: NetworkId = parse_id(new_name)?;
                if let Some(mut network) = self.networks.remove(old) {
                    network.set_id(new);
                    self.networks.insert(network);
                }
            }
            TypeTag::Identity => {
                let old: IdentityId = parse_id(old_name)?;
                let new: IdentityId = parse_id(new_name)?;
                if let Some(mut identity) = self.identities.remove(old) {
                    identity.set_id(new);
                    self.identities.insert(identity);
                }
            }
            TypeTag::BufferViewConfig => {
                let old: i32 = parse_id(old_name)?;
                let new: i32 = parse_id(new_name)?;
                if let Some(mut view) = self.buffer_views.remove(&old) {
                    view.set_id(new);
                    self.buffer_views.insert(new, view);
                }
            }
            TypeTag::IrcChannel | TypeTag::IrcUser => {
                let (network, old_child) = split_scoped(old_name)?;
                let (new_network, new_child) = split_scoped(new_name)?;
                if network != new_network {
                    return Err(SyncError::MalformedIdentifier {
                        name: new_name.to_string(),
                        reason: "rename across networks",
                    });
                }
                let network = self.network_mut(network)?;
                if tag == TypeTag::IrcChannel {
                    network.rename_channel(old_child, new_child);
                } else {
                    network.rename_user(old_child, new_child);
                }
            }
            _ => {
                if let Some(mut object) = self.singletons.remove(&(tag, old_name.to_string())) {
                    object.set_singleton_name(new_name);
                    self.singletons.insert((tag, new_name.to_string()), object);
                }
            }
        }
        debug!(type_tag = %tag, old = %old_name, new = %new_name, "Renamed object");
        Ok(())
    }

    pub fn networks(&self) -> &NetworkDirectory {
        &self.networks
    }

    pub(crate) fn networks_mut(&mut self) -> &mut NetworkDirectory {
        &mut self.networks
    }

    pub fn identities(&self) -> &IdentityDirectory {
        &self.identities
    }

    pub(crate) fn identities_mut(&mut self) -> &mut IdentityDirectory {
        &mut self.identities
    }

    pub fn channel(&self, network: NetworkId, name: &str) -> Option<&IrcChannel> {
        self.networks.get(network).and_then(|n| n.channel(name))
    }

    pub fn buffer_view(&self, id: i32) -> Option<&BufferViewConfig> {
        self.buffer_views.get(&id)
    }

    pub fn buffer_view_manager(&self) -> Option<&BufferViewManager> {
        self.singletons.values().find_map(|object| match object {
            SyncObject::BufferViewManager(manager) => Some(manager),
            _ => None,
        })
    }

    /// Number of replicas, children included.
    pub fn object_count(&self) -> usize {
        let children: usize = self
            .networks
            .iter()
            .map(|n| n.channels().count() + n.users().count())
            .sum();
        self.networks.len()
            + children
            + self.identities.len()
            + self.buffer_views.len()
            + self.singletons.len()
    }

    /// Drop everything and start over.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn network_mut(&mut self, id: NetworkId) -> SyncResult<&mut crate::model::Network> {
        self.networks
            .get_mut(id)
            .ok_or_else(|| SyncError::not_found(TypeTag::Network, &id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quassel_proto::Value;

    fn fields(pairs: Vec<(&str, Value)>) -> FieldMap {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn registry_with_network() -> ObjectRegistry {
        let mut registry = ObjectRegistry::new();
        registry.networks_mut().create(NetworkId(1));
        registry
    }

    // ========================================================================
    // resolve() tests
    // ========================================================================

    #[test]
    fn new_registry_holds_backlog_manager() {
        let registry = ObjectRegistry::new();
        let backlog = registry.resolve(TypeTag::BacklogManager, "").unwrap();
        assert!(backlog.is_initialized());
        assert_eq!(registry.object_count(), 1);
    }

    #[test]
    fn resolve_missing_parent_is_not_found() {
        let registry = ObjectRegistry::new();
        let err = registry.resolve(TypeTag::IrcChannel, "1/#a").err().unwrap();
        assert!(matches!(err, SyncError::NotFound { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn resolve_malformed_scoped_name() {
        let registry = registry_with_network();
        let err = registry.resolve(TypeTag::IrcUser, "1alice").err().unwrap();
        assert_eq!(err.error_code(), "malformed_identifier");
    }

    #[test]
    fn singleton_resolution_checks_name() {
        let mut registry = ObjectRegistry::new();
        registry
            .initialize(TypeTag::NetworkConfig, "GlobalNetworkConfig", FieldMap::new())
            .unwrap();
        assert!(registry.resolve(TypeTag::NetworkConfig, "GlobalNetworkConfig").is_ok());
        assert!(registry.resolve(TypeTag::NetworkConfig, "").is_err());
    }

    #[test]
    fn singletons_with_other_names_coexist() {
        let mut registry = ObjectRegistry::new();
        registry
            .initialize(TypeTag::NetworkConfig, "GlobalNetworkConfig", FieldMap::new())
            .unwrap();
        registry
            .initialize(TypeTag::NetworkConfig, "Other", fields(vec![("x", Value::Int(1))]))
            .unwrap();
        let global = registry.resolve(TypeTag::NetworkConfig, "GlobalNetworkConfig").unwrap();
        assert!(global.properties().get("x").is_none());
        assert!(registry.resolve(TypeTag::NetworkConfig, "Other").is_ok());
        assert_eq!(registry.object_count(), 3);
    }

    // ========================================================================
    // initialize() tests
    // ========================================================================

    #[test]
    fn initialize_creates_missing_objects() {
        let mut registry = ObjectRegistry::new();
        registry
            .initialize(TypeTag::BufferSyncer, "", fields(vec![("x", Value::Int(1))]))
            .unwrap();
        let syncer = registry.resolve(TypeTag::BufferSyncer, "").unwrap();
        assert!(syncer.is_initialized());
        assert_eq!(syncer.properties().get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn initialize_child_needs_network() {
        let mut registry = ObjectRegistry::new();
        let err = registry
            .initialize(TypeTag::IrcChannel, "1/#a", FieldMap::new())
            .unwrap_err();
        assert!(matches!(err, SyncError::NotFound { type_tag: TypeTag::Network, .. }));

        let mut registry = registry_with_network();
        registry
            .initialize(TypeTag::IrcChannel, "1/#a", fields(vec![("topic", Value::from("t"))]))
            .unwrap();
        assert_eq!(registry.channel(NetworkId(1), "#a").unwrap().topic(), Some("t"));
    }

    #[test]
    fn initialize_existing_keeps_instance_state() {
        let mut registry = registry_with_network();
        registry
            .resolve_mut(TypeTag::Network, "1")
            .unwrap()
            .apply(fields(vec![("a", Value::Int(1))]));
        registry
            .initialize(TypeTag::Network, "1", fields(vec![("b", Value::Int(2))]))
            .unwrap();
        let network = registry.resolve(TypeTag::Network, "1").unwrap();
        assert!(network.is_initialized());
        assert_eq!(network.properties().len(), 2);
    }

    // ========================================================================
    // rename() tests
    // ========================================================================

    #[test]
    fn rename_preserves_identity() {
        let mut registry = registry_with_network();
        registry
            .initialize(TypeTag::IrcUser, "1/alice", fields(vec![("away", Value::Bool(true))]))
            .unwrap();
        let before = registry.lookup(TypeTag::IrcUser, "1/alice").unwrap();

        registry.rename(TypeTag::IrcUser, "1/alice", "1/alicia").unwrap();

        assert!(matches!(
            registry.resolve(TypeTag::IrcUser, "1/alice"),
            Err(SyncError::NotFound { .. })
        ));
        let after = registry.resolve(TypeTag::IrcUser, "1/alicia").unwrap();
        assert_eq!(after.properties().get("away"), Some(&Value::Bool(true)));
        assert_eq!(after.object_name(), "1/alicia");
        assert_ne!(before.object_name(), after.object_name());
    }

    #[test]
    fn rename_missing_target_is_fatal() {
        let mut registry = registry_with_network();
        let err = registry.rename(TypeTag::IrcUser, "1/ghost", "1/spirit").unwrap_err();
        assert!(err.is_fatal());
        let err = registry.rename(TypeTag::Network, "9", "10").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn rename_network_moves_children() {
        let mut registry = registry_with_network();
        registry.initialize(TypeTag::IrcChannel, "1/#a", FieldMap::new()).unwrap();
        registry.rename(TypeTag::Network, "1", "5").unwrap();
        assert!(registry.resolve(TypeTag::Network, "1").is_err());
        assert!(registry.resolve(TypeTag::IrcChannel, "5/#a").is_ok());
    }

    #[test]
    fn rename_onto_taken_name_keeps_both() {
        let mut registry = registry_with_network();
        registry.networks_mut().create(NetworkId(2));
        let err = registry.rename(TypeTag::Network, "1", "2").unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(err.error_code(), "malformed_identifier");
        assert_eq!(registry.networks().len(), 2);

        registry.initialize(TypeTag::IrcUser, "1/alice", FieldMap::new()).unwrap();
        registry.initialize(TypeTag::IrcUser, "1/bob", FieldMap::new()).unwrap();
        assert!(registry.rename(TypeTag::IrcUser, "1/alice", "1/bob").is_err());
        assert!(registry.resolve(TypeTag::IrcUser, "1/alice").is_ok());
        assert!(registry.resolve(TypeTag::IrcUser, "1/bob").is_ok());
    }

    #[test]
    fn rename_across_networks_is_rejected() {
        let mut registry = registry_with_network();
        registry.initialize(TypeTag::IrcChannel, "1/#a", FieldMap::new()).unwrap();
        let err = registry.rename(TypeTag::IrcChannel, "1/#a", "2/#a").unwrap_err();
        assert!(!err.is_fatal());
        assert!(registry.resolve(TypeTag::IrcChannel, "1/#a").is_ok());
    }

    #[test]
    fn rename_singleton() {
        let mut registry = ObjectRegistry::new();
        registry.initialize(TypeTag::CoreInfo, "", FieldMap::new()).unwrap();
        registry.rename(TypeTag::CoreInfo, "", "CoreInfo").unwrap();
        assert!(registry.resolve(TypeTag::CoreInfo, "CoreInfo").is_ok());
        assert!(registry.resolve(TypeTag::CoreInfo, "").is_err());
    }

    #[test]
    fn clear_resets_to_new() {
        let mut registry = registry_with_network();
        registry.initialize(TypeTag::AliasManager, "", FieldMap::new()).unwrap();
        registry.clear();
        assert!(registry.networks().is_empty());
        assert_eq!(registry.object_count(), 1);
    }
}
