//! Backlog storage abstraction.
//!
//! The session hands every received message to a [`BacklogStorage`] and
//! never reads history back itself. Calls are synchronous because inbound
//! dispatch must not suspend; implementations that talk to slow media should
//! queue internally.

use quassel_proto::{BufferId, Message};
use thiserror::Error;

pub mod memory;
pub mod noop;

pub use memory::MemoryStorage;
pub use noop::NoOpStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub trait BacklogStorage: Send + Sync {
    /// Store a page of history for one buffer.
    fn store_messages(&self, buffer: BufferId, messages: &[Message]) -> Result<(), StorageError>;

    /// Store one live message.
    fn insert_message(&self, message: &Message) -> Result<(), StorageError>;

    /// Forget all history of a buffer.
    fn clear_messages(&self, buffer: BufferId) -> Result<(), StorageError>;

    /// Stored history of a buffer, oldest first.
    fn messages(&self, buffer: BufferId) -> Result<Vec<Message>, StorageError>;
}
