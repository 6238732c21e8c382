//! Pending-request tracking.
//!
//! Both bootstrap gates are the same structure: a set of keys that were asked
//! for, which signals completion exactly once, on the fulfilment that empties
//! it. Fulfilling an unknown key is ignored, and an already-completed set
//! stays silent until new keys are expected.

use std::collections::BTreeSet;

use quassel_proto::{BufferId, FieldMap, InitKey, TypeTag};

use crate::deferred::DeferredMutations;

/// Result of a fulfilment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The key was not pending.
    Ignored,
    /// The key was pending and others remain.
    Progress,
    /// The key was the last pending one. Reported once per arming.
    Completed,
}

/// Edge-triggered pending set.
#[derive(Clone, Debug)]
pub struct PendingSet<K> {
    pending: BTreeSet<K>,
    armed: bool,
}

impl<K> Default for PendingSet<K> {
    fn default() -> Self {
        Self {
            pending: BTreeSet::new(),
            armed: false,
        }
    }
}

impl<K: Ord> PendingSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. Returns `false` if it was already pending.
    pub fn expect(&mut self, key: K) -> bool {
        self.armed = true;
        self.pending.insert(key)
    }

    pub fn fulfil(&mut self, key: &K) -> Completion {
        if !self.pending.remove(key) {
            return Completion::Ignored;
        }
        if self.pending.is_empty() && self.armed {
            self.armed = false;
            Completion::Completed
        } else {
            Completion::Progress
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.pending.contains(key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop all keys and disarm.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.armed = false;
    }
}

/// What fulfilling an init key produced.
#[derive(Debug, PartialEq)]
pub struct InitFulfilment {
    /// Mutation that arrived before the init response.
    pub replay: Option<FieldMap>,
    pub completion: Completion,
}

/// Init requests awaiting their response.
#[derive(Clone, Debug, Default)]
pub struct InitTracker {
    pending: PendingSet<InitKey>,
}

impl InitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&mut self, tag: TypeTag, name: &str) -> bool {
        self.pending.expect(InitKey::new(tag, name))
    }

    /// Mark `(tag, name)` as received and hand back its deferred mutation.
    ///
    /// The deferred slot is drained even when the key was never requested,
    /// since the core may push objects the client did not ask for.
    pub fn fulfil(
        &mut self,
        tag: TypeTag,
        name: &str,
        deferred: &mut DeferredMutations,
    ) -> InitFulfilment {
        let key = InitKey::new(tag, name);
        let completion = self.pending.fulfil(&key);
        InitFulfilment {
            replay: deferred.drain(&key),
            completion,
        }
    }

    pub fn is_pending(&self, tag: TypeTag, name: &str) -> bool {
        self.pending.contains(&InitKey::new(tag, name))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Buffers still owed their first backlog page.
#[derive(Clone, Debug, Default)]
pub struct BacklogTracker {
    pending: PendingSet<BufferId>,
}

impl BacklogTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&mut self, buffer: BufferId) -> bool {
        self.pending.expect(buffer)
    }

    pub fn fulfil(&mut self, buffer: BufferId) -> Completion {
        self.pending.fulfil(&buffer)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quassel_proto::Value;

    // ========================================================================
    // PendingSet tests
    // ========================================================================

    #[test]
    fn completes_once_on_last_fulfilment() {
        let mut set = PendingSet::new();
        set.expect(1);
        set.expect(2);
        assert_eq!(set.fulfil(&2), Completion::Progress);
        assert_eq!(set.fulfil(&1), Completion::Completed);
        assert_eq!(set.fulfil(&1), Completion::Ignored);
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_key_is_ignored() {
        let mut set = PendingSet::new();
        set.expect(1);
        assert_eq!(set.fulfil(&7), Completion::Ignored);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_expect_counts_once() {
        let mut set = PendingSet::new();
        assert!(set.expect(1));
        assert!(!set.expect(1));
        assert_eq!(set.fulfil(&1), Completion::Completed);
    }

    #[test]
    fn rearming_after_completion() {
        let mut set = PendingSet::new();
        set.expect(1);
        assert_eq!(set.fulfil(&1), Completion::Completed);
        set.expect(2);
        assert_eq!(set.fulfil(&2), Completion::Completed);
    }

    #[test]
    fn clear_disarms() {
        let mut set = PendingSet::new();
        set.expect(1);
        set.clear();
        assert_eq!(set.fulfil(&1), Completion::Ignored);
    }

    // ========================================================================
    // InitTracker tests
    // ========================================================================

    #[test]
    fn fulfil_drains_deferred_mutation() {
        let mut tracker = InitTracker::new();
        let mut deferred = DeferredMutations::new();
        let mut fields = FieldMap::new();
        fields.insert("topic".to_string(), Value::from("x"));
        deferred.buffer(InitKey::new(TypeTag::Network, "1"), fields.clone());

        tracker.expect(TypeTag::BufferSyncer, "");
        let result = tracker.fulfil(TypeTag::Network, "1", &mut deferred);
        assert_eq!(result.completion, Completion::Ignored);
        assert_eq!(result.replay, Some(fields));
        assert!(deferred.is_empty());
        assert!(tracker.is_pending(TypeTag::BufferSyncer, ""));
    }

    #[test]
    fn init_tracker_completes() {
        let mut tracker = InitTracker::new();
        let mut deferred = DeferredMutations::new();
        tracker.expect(TypeTag::AliasManager, "");
        tracker.expect(TypeTag::NetworkConfig, "GlobalNetworkConfig");
        let first = tracker.fulfil(TypeTag::AliasManager, "", &mut deferred);
        assert_eq!(first.completion, Completion::Progress);
        assert_eq!(first.replay, None);
        let last = tracker.fulfil(TypeTag::NetworkConfig, "GlobalNetworkConfig", &mut deferred);
        assert_eq!(last.completion, Completion::Completed);
    }

    // ========================================================================
    // BacklogTracker tests
    // ========================================================================

    #[test]
    fn backlog_redundant_fulfilments_are_ignored() {
        let mut tracker = BacklogTracker::new();
        tracker.expect(BufferId(10));
        tracker.expect(BufferId(11));
        assert_eq!(tracker.fulfil(BufferId(10)), Completion::Progress);
        assert_eq!(tracker.fulfil(BufferId(10)), Completion::Ignored);
        assert_eq!(tracker.fulfil(BufferId(11)), Completion::Completed);
        assert_eq!(tracker.fulfil(BufferId(11)), Completion::Ignored);
    }
}
