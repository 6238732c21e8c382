//! No-op backlog storage that discards all messages.
//!
//! Used when the embedding client keeps no history.
//! All operations succeed but store nothing.

use quassel_proto::{BufferId, Message};

use super::{BacklogStorage, StorageError};

pub struct NoOpStorage;

impl BacklogStorage for NoOpStorage {
    fn store_messages(&self, _buffer: BufferId, _messages: &[Message]) -> Result<(), StorageError> {
        Ok(())
    }

    fn insert_message(&self, _message: &Message) -> Result<(), StorageError> {
        Ok(())
    }

    fn clear_messages(&self, _buffer: BufferId) -> Result<(), StorageError> {
        Ok(())
    }

    fn messages(&self, _buffer: BufferId) -> Result<Vec<Message>, StorageError> {
        Ok(vec![])
    }
}
