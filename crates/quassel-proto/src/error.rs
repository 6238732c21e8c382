//! Error types for identifier parsing.

use thiserror::Error;

/// Errors raised while interpreting protocol identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtoError {
    /// The type tag names no object kind this client models.
    #[error("unknown type tag: {0}")]
    UnknownType(String),

    /// An object name does not have the shape its type requires.
    #[error("malformed identifier {name:?}: {reason}")]
    MalformedIdentifier {
        /// The offending object name.
        name: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl ProtoError {
    pub(crate) fn malformed(name: &str, reason: &'static str) -> Self {
        Self::MalformedIdentifier {
            name: name.to_string(),
            reason,
        }
    }
}
