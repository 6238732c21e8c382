//! Property-backed singletons and buffer views.

use std::collections::BTreeMap;

use quassel_proto::{BufferId, FieldMap, MsgId, TypeTag, Value};

use super::syncable::{Properties, impl_syncable};

/// Read markers and marker lines per buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BufferSyncer {
    name: String,
    state: Properties,
    last_seen: BTreeMap<BufferId, MsgId>,
    marker_lines: BTreeMap<BufferId, MsgId>,
}

impl_syncable!(BufferSyncer, TypeTag::BufferSyncer, |s| s.name.clone(), refresh = BufferSyncer::rebuild);

impl BufferSyncer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn last_seen(&self, buffer: BufferId) -> Option<MsgId> {
        self.last_seen.get(&buffer).copied()
    }

    pub fn marker_line(&self, buffer: BufferId) -> Option<MsgId> {
        self.marker_lines.get(&buffer).copied()
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn rebuild(&mut self, changed: &FieldMap) {
        if let Some(list) = changed.get("LastSeenMsg") {
            self.last_seen = buffer_msg_pairs(list);
        }
        if let Some(list) = changed.get("MarkerLines") {
            self.marker_lines = buffer_msg_pairs(list);
        }
    }
}

/// Decode a flat `[buffer, msg, buffer, msg, ...]` list.
fn buffer_msg_pairs(value: &Value) -> BTreeMap<BufferId, MsgId> {
    let Some(items) = value.as_list() else {
        return BTreeMap::new();
    };
    items
        .chunks_exact(2)
        .filter_map(|pair| {
            let buffer = i32::try_from(pair[0].as_i64()?).ok()?;
            Some((BufferId(buffer), MsgId(pair[1].as_i64()?)))
        })
        .collect()
}

/// Registry of buffer views.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BufferViewManager {
    name: String,
    state: Properties,
    view_ids: Vec<i32>,
}

impl_syncable!(BufferViewManager, TypeTag::BufferViewManager, |s| s.name.clone(), refresh = BufferViewManager::rebuild);

impl BufferViewManager {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Ids of every configured buffer view.
    pub fn view_ids(&self) -> &[i32] {
        &self.view_ids
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn rebuild(&mut self, changed: &FieldMap) {
        if let Some(ids) = changed.get("BufferViewIds").and_then(Value::as_list) {
            self.view_ids = ids
                .iter()
                .filter_map(Value::as_i64)
                .filter_map(|id| i32::try_from(id).ok())
                .collect();
        }
    }
}

/// One configured buffer view.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferViewConfig {
    id: i32,
    state: Properties,
}

impl_syncable!(BufferViewConfig, TypeTag::BufferViewConfig, |s| s.id.to_string());

impl BufferViewConfig {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            state: Properties::default(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn view_name(&self) -> Option<&str> {
        self.state.fields.get("bufferViewName").and_then(Value::as_str)
    }

    /// Buffers shown in this view, in display order.
    pub fn buffers(&self) -> Vec<BufferId> {
        self.state
            .fields
            .get("BufferList")
            .and_then(Value::as_list)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_i64)
                    .filter_map(|id| i32::try_from(id).ok())
                    .map(BufferId)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

/// Core version and runtime information.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoreInfo {
    name: String,
    state: Properties,
}

impl_syncable!(CoreInfo, TypeTag::CoreInfo, |s| s.name.clone());

impl CoreInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Properties::default(),
        }
    }

    /// Entry of the `coreData` map.
    pub fn core_data(&self, key: &str) -> Option<&Value> {
        self.state
            .fields
            .get("coreData")
            .and_then(Value::as_map)
            .and_then(|data| data.get(key))
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Backlog fetch endpoint. Has no state of its own, so it counts as
/// initialized from the moment it exists.
#[derive(Clone, Debug, PartialEq)]
pub struct BacklogManager {
    name: String,
    state: Properties,
}

impl_syncable!(BacklogManager, TypeTag::BacklogManager, |s| s.name.clone());

impl BacklogManager {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Properties::initialized(),
        }
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Global network settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkConfig {
    name: String,
    state: Properties,
}

impl_syncable!(NetworkConfig, TypeTag::NetworkConfig, |s| s.name.clone());

impl NetworkConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Properties::default(),
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.state
            .fields
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn number(&self, key: &str) -> i64 {
        self.state
            .fields
            .get(key)
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    pub fn ping_timeout_enabled(&self) -> bool {
        self.flag("pingTimeoutEnabled")
    }

    /// Seconds between pings.
    pub fn ping_interval(&self) -> i64 {
        self.number("pingInterval")
    }

    pub fn max_ping_count(&self) -> i64 {
        self.number("maxPingCount")
    }

    pub fn auto_who_enabled(&self) -> bool {
        self.flag("autoWhoEnabled")
    }

    pub fn auto_who_interval(&self) -> i64 {
        self.number("autoWhoInterval")
    }

    pub fn auto_who_nick_limit(&self) -> i64 {
        self.number("autoWhoNickLimit")
    }

    pub fn auto_who_delay(&self) -> i64 {
        self.number("autoWhoDelay")
    }

    pub fn standard_ctcp(&self) -> bool {
        self.flag("standardCtcp")
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}
