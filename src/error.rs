//! Unified error handling for the session engine.
//!
//! Every failure the dispatch path can hit is a [`SyncError`]. Only
//! [`SyncError::RenameTargetMissing`] is fatal; everything else is logged,
//! counted, and the offending call is skipped.

use quassel_proto::{ProtoError, TypeTag};
use thiserror::Error;

use crate::phase::ConnectionPhase;

// ============================================================================
// Sync Errors (inbound dispatch)
// ============================================================================

/// Errors that can occur while applying an inbound call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The object, or the network it lives in, is not known yet.
    #[error("{type_tag} {name:?} not found")]
    NotFound { type_tag: TypeTag, name: String },

    /// Unknown type tag or buffer kind.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("malformed identifier {name:?}: {reason}")]
    MalformedIdentifier { name: String, reason: &'static str },

    /// The core echoed a non-zero peer handle on a password change.
    #[error("security anomaly: {0}")]
    SecurityAnomaly(String),

    /// The core renamed an object this client never saw.
    #[error("rename of missing {type_tag} {old_name:?} to {new_name:?}")]
    RenameTargetMissing {
        type_tag: TypeTag,
        old_name: String,
        new_name: String,
    },

    #[error("invalid phase transition from {from} to {to}")]
    InvalidTransition {
        from: ConnectionPhase,
        to: ConnectionPhase,
    },
}

impl SyncError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::UnsupportedType(_) => "unsupported_type",
            Self::MalformedIdentifier { .. } => "malformed_identifier",
            Self::SecurityAnomaly(_) => "security_anomaly",
            Self::RenameTargetMissing { .. } => "rename_target_missing",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// Whether the registry can no longer be trusted after this error.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RenameTargetMissing { .. })
    }

    pub(crate) fn not_found(type_tag: TypeTag, name: &str) -> Self {
        Self::NotFound {
            type_tag,
            name: name.to_string(),
        }
    }
}

impl From<ProtoError> for SyncError {
    fn from(err: ProtoError) -> Self {
        match err {
            ProtoError::UnknownType(tag) => Self::UnsupportedType(tag),
            ProtoError::MalformedIdentifier { name, reason } => {
                Self::MalformedIdentifier { name, reason }
            }
            other => Self::UnsupportedType(other.to_string()),
        }
    }
}

/// Result type for inbound dispatch.
pub type SyncResult<T = ()> = Result<T, SyncError>;
