//! Identity replica.

use quassel_proto::{FieldMap, IdentityId, TypeTag, Value};

use super::syncable::{Properties, impl_syncable};

#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    id: IdentityId,
    state: Properties,
}

impl_syncable!(Identity, TypeTag::Identity, |i| i.id.to_string());

impl Identity {
    pub fn new(id: IdentityId) -> Self {
        Self {
            id,
            state: Properties::default(),
        }
    }

    /// Read the id out of a full property map.
    pub fn id_from_fields(fields: &FieldMap) -> Option<IdentityId> {
        let id = fields.get("identityId")?.as_i64()?;
        i32::try_from(id).ok().map(IdentityId)
    }

    pub fn id(&self) -> IdentityId {
        self.id
    }

    pub fn identity_name(&self) -> Option<&str> {
        self.state.fields.get("identityName").and_then(Value::as_str)
    }

    pub fn real_name(&self) -> Option<&str> {
        self.state.fields.get("realName").and_then(Value::as_str)
    }

    /// Nicks in order of preference.
    pub fn nicks(&self) -> Vec<&str> {
        self.state
            .fields
            .get("nicks")
            .and_then(Value::as_list)
            .map(|nicks| nicks.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub(crate) fn set_id(&mut self, id: IdentityId) {
        self.id = id;
        self.state
            .fields
            .insert("identityId".to_string(), Value::from(id.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Syncable;

    #[test]
    fn identity_from_fields() {
        let mut fields = FieldMap::new();
        fields.insert("identityId".to_string(), Value::Int(3));
        fields.insert("identityName".to_string(), Value::from("Work"));
        fields.insert("nicks".to_string(), Value::from(vec!["me", "me_"]));

        let id = Identity::id_from_fields(&fields).unwrap();
        let mut identity = Identity::new(id);
        identity.init(fields);
        assert_eq!(identity.object_name(), "3");
        assert_eq!(identity.identity_name(), Some("Work"));
        assert_eq!(identity.nicks(), vec!["me", "me_"]);
        assert_eq!(identity.real_name(), None);
    }

    #[test]
    fn missing_identity_id() {
        assert_eq!(Identity::id_from_fields(&FieldMap::new()), None);
    }

    #[test]
    fn set_id_updates_property() {
        let mut identity = Identity::new(IdentityId(1));
        identity.set_id(IdentityId(4));
        assert_eq!(identity.properties().get("identityId"), Some(&Value::Int(4)));
    }
}
