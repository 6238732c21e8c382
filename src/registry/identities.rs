//! Identity directory.

use im::OrdMap;
use quassel_proto::{FieldMap, IdentityId};

use crate::error::SyncError;
use crate::model::{Identity, Syncable};

/// Owns every identity replica.
///
/// Identities always arrive with their full state, so they are stored
/// initialized.
#[derive(Clone, Debug, Default)]
pub struct IdentityDirectory {
    identities: OrdMap<IdentityId, Identity>,
}

impl IdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace an identity from its full property map.
    pub fn create(&mut self, fields: FieldMap) -> Result<IdentityId, SyncError> {
        let id = Identity::id_from_fields(&fields).ok_or(SyncError::MalformedIdentifier {
            name: "identityId".to_string(),
            reason: "identity without a numeric identityId",
        })?;
        let mut identity = Identity::new(id);
        identity.init(fields);
        self.identities.insert(id, identity);
        Ok(id)
    }

    pub(crate) fn insert(&mut self, identity: Identity) {
        self.identities.insert(identity.id(), identity);
    }

    pub fn remove(&mut self, id: IdentityId) -> Option<Identity> {
        self.identities.remove(&id)
    }

    pub fn get(&self, id: IdentityId) -> Option<&Identity> {
        self.identities.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: IdentityId) -> Option<&mut Identity> {
        self.identities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.identities.values()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
