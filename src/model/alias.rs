//! Global alias list.

use quassel_proto::{FieldMap, TypeTag, Value};
use tracing::warn;

use super::syncable::{Properties, impl_syncable};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub expansion: String,
}

/// Command aliases shared by every client of the core.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AliasManager {
    name: String,
    state: Properties,
    aliases: Vec<Alias>,
}

impl_syncable!(AliasManager, TypeTag::AliasManager, |s| s.name.clone(), refresh = AliasManager::rebuild);

impl AliasManager {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Expansion for `/name`, matched case-insensitively.
    pub fn expansion(&self, name: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|alias| alias.name.eq_ignore_ascii_case(name))
            .map(|alias| alias.expansion.as_str())
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn rebuild(&mut self, changed: &FieldMap) {
        let Some(map) = changed.get("Aliases").and_then(Value::as_map) else {
            return;
        };
        let names = string_list(map.get("names"));
        let expansions = string_list(map.get("expansions"));
        if names.len() != expansions.len() {
            warn!(
                names = names.len(),
                expansions = expansions.len(),
                "Alias lists differ in length, keeping previous aliases"
            );
            return;
        }
        self.aliases = names
            .into_iter()
            .zip(expansions)
            .map(|(name, expansion)| Alias { name, expansion })
            .collect();
    }
}

pub(super) fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_list)
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
