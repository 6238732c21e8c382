//! Deferred mutation buffer.
//!
//! Holds one mutation per object key for objects that are not initialized
//! yet. A later mutation for the same key replaces the earlier one; callers
//! are told when that happens so it can be logged and counted.

use std::collections::HashMap;

use quassel_proto::{FieldMap, InitKey};

#[derive(Clone, Debug, Default)]
pub struct DeferredMutations {
    slots: HashMap<InitKey, FieldMap>,
}

impl DeferredMutations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `fields` for `key`. Returns `true` if an earlier mutation was replaced.
    pub fn buffer(&mut self, key: InitKey, fields: FieldMap) -> bool {
        self.slots.insert(key, fields).is_some()
    }

    pub fn drain(&mut self, key: &InitKey) -> Option<FieldMap> {
        self.slots.remove(key)
    }

    /// Move a parked mutation along with a renamed object.
    pub fn rekey(&mut self, old: &InitKey, new: InitKey) {
        if let Some(fields) = self.slots.remove(old) {
            self.slots.insert(new, fields);
        }
    }

    pub fn contains(&self, key: &InitKey) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
