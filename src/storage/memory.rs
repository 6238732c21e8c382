//! In-memory backlog storage.

use std::collections::HashMap;

use parking_lot::Mutex;
use quassel_proto::{BufferId, Message};

use super::{BacklogStorage, StorageError};

/// Keeps every message in memory, ordered and de-duplicated by message id.
#[derive(Default)]
pub struct MemoryStorage {
    buffers: Mutex<HashMap<BufferId, Vec<Message>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored messages.
    pub fn len(&self) -> usize {
        self.buffers.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn merge(stored: &mut Vec<Message>, incoming: impl IntoIterator<Item = Message>) {
    stored.extend(incoming);
    stored.sort_by_key(|m| m.msg_id);
    stored.dedup_by_key(|m| m.msg_id);
}

impl BacklogStorage for MemoryStorage {
    fn store_messages(&self, buffer: BufferId, messages: &[Message]) -> Result<(), StorageError> {
        let mut buffers = self.buffers.lock();
        merge(buffers.entry(buffer).or_default(), messages.iter().cloned());
        Ok(())
    }

    fn insert_message(&self, message: &Message) -> Result<(), StorageError> {
        let mut buffers = self.buffers.lock();
        merge(
            buffers.entry(message.buffer_id).or_default(),
            std::iter::once(message.clone()),
        );
        Ok(())
    }

    fn clear_messages(&self, buffer: BufferId) -> Result<(), StorageError> {
        self.buffers.lock().remove(&buffer);
        Ok(())
    }

    fn messages(&self, buffer: BufferId) -> Result<Vec<Message>, StorageError> {
        Ok(self.buffers.lock().get(&buffer).cloned().unwrap_or_default())
    }
}
