//! Global ignore rules.
//!
//! The core ships the rule set as seven parallel lists. A payload whose lists
//! do not line up is rejected as a whole.

use quassel_proto::{FieldMap, TypeTag, Value};
use tracing::warn;

use super::alias::string_list;
use super::syncable::{Properties, impl_syncable};

/// What part of a message a rule matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IgnoreType {
    #[default]
    Sender,
    Message,
    Ctcp,
}

impl IgnoreType {
    fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Message,
            2 => Self::Ctcp,
            _ => Self::Sender,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    #[default]
    Unmatched,
    Soft,
    Hard,
}

impl Strictness {
    fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Soft,
            2 => Self::Hard,
            _ => Self::Unmatched,
        }
    }
}

/// Where a rule applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Global,
    Network,
    Channel,
}

impl Scope {
    fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Network,
            2 => Self::Channel,
            _ => Self::Global,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IgnoreRule {
    pub kind: IgnoreType,
    pub rule: String,
    pub is_regex: bool,
    pub strictness: Strictness,
    pub scope: Scope,
    pub scope_rule: String,
    pub active: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IgnoreListManager {
    name: String,
    state: Properties,
    rules: Vec<IgnoreRule>,
}

impl_syncable!(IgnoreListManager, TypeTag::IgnoreListManager, |s| s.name.clone(), refresh = IgnoreListManager::rebuild);

impl IgnoreListManager {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn active_rules(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter().filter(|rule| rule.active)
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn rebuild(&mut self, changed: &FieldMap) {
        let Some(map) = changed.get("IgnoreList").and_then(Value::as_map) else {
            return;
        };
        let kinds = int_list(map.get("ignoreType"));
        let rules = string_list(map.get("ignoreRule"));
        let regex = bool_list(map.get("isRegEx"));
        let strictness = int_list(map.get("strictness"));
        let scopes = int_list(map.get("scope"));
        let scope_rules = string_list(map.get("scopeRule"));
        let active = bool_list(map.get("isActive"));

        let len = kinds.len();
        let lengths = [
            rules.len(),
            regex.len(),
            strictness.len(),
            scopes.len(),
            scope_rules.len(),
            active.len(),
        ];
        if lengths.iter().any(|&other| other != len) {
            warn!(rules = len, ?lengths, "Ignore list columns differ in length, rejecting update");
            return;
        }

        self.rules = (0..len)
            .map(|i| IgnoreRule {
                kind: IgnoreType::from_code(kinds[i]),
                rule: rules[i].clone(),
                is_regex: regex[i],
                strictness: Strictness::from_code(strictness[i]),
                scope: Scope::from_code(scopes[i]),
                scope_rule: scope_rules[i].clone(),
                active: active[i],
            })
            .collect();
    }
}

fn int_list(value: Option<&Value>) -> Vec<i64> {
    value
        .and_then(Value::as_list)
        .map(|items| items.iter().map(|v| v.as_i64().unwrap_or(0)).collect())
        .unwrap_or_default()
}

fn bool_list(value: Option<&Value>) -> Vec<bool> {
    value
        .and_then(Value::as_list)
        .map(|items| items.iter().map(|v| v.as_bool().unwrap_or(false)).collect())
        .unwrap_or_default()
}
