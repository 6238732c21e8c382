//! Inbound and outbound call records.
//!
//! These are the decoded shapes a transport exchanges with a session. Type
//! tags on inbound calls are kept as raw strings so that a call for an object
//! kind this client does not model can still be received, logged and skipped.

use crate::buffer::BufferInfo;
use crate::ident::TypeTag;
use crate::ids::{BufferId, IdentityId, NetworkId};
use crate::message::Message;
use crate::state::SessionState;
use crate::value::FieldMap;

/// A call pushed by the core.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum InboundCall {
    /// Full initial state of an object.
    InitResponse {
        /// Object type tag.
        type_tag: String,
        /// Object name.
        name: String,
        /// Every property of the object.
        #[cfg_attr(feature = "serde", serde(default))]
        fields: FieldMap,
    },
    /// Incremental property update.
    Mutation {
        /// Object type tag.
        type_tag: String,
        /// Object name.
        name: String,
        /// Properties being set.
        #[cfg_attr(feature = "serde", serde(default))]
        fields: FieldMap,
    },
    /// An object changed its name.
    Rename {
        /// Object type tag.
        type_tag: String,
        /// Current name.
        old_name: String,
        /// Name after the rename.
        new_name: String,
    },
    /// A network was added on the core.
    NetworkCreated {
        /// New network.
        network_id: NetworkId,
    },
    /// A network was deleted on the core.
    NetworkRemoved {
        /// Removed network.
        network_id: NetworkId,
    },
    /// An identity was added; carries its full property map.
    IdentityCreated {
        /// Identity properties, including `identityId`.
        fields: FieldMap,
    },
    /// An identity was deleted.
    IdentityRemoved {
        /// Removed identity.
        identity_id: IdentityId,
    },
    /// A buffer descriptor was added or changed.
    BufferInfoUpdated {
        /// New descriptor.
        buffer_info: BufferInfo,
    },
    /// A buffer was deleted.
    BufferRemoved {
        /// Removed buffer.
        buffer_id: BufferId,
    },
    /// A buffer was renamed (query follows a nick change).
    BufferRenamed {
        /// Renamed buffer.
        buffer_id: BufferId,
        /// Name after the rename.
        new_name: String,
    },
    /// Outcome of a password change request.
    PasswordChangeResult {
        /// Whether the core accepted the new password.
        success: bool,
        /// Peer handle echoed by the core. Must be zero.
        #[cfg_attr(feature = "serde", serde(default))]
        peer_handle: u64,
    },
    /// A page of history for a buffer.
    BacklogReceived {
        /// Buffer the page belongs to.
        buffer_id: BufferId,
        /// Messages, oldest first.
        #[cfg_attr(feature = "serde", serde(default))]
        messages: Vec<Message>,
    },
    /// A live message.
    DisplayMessage {
        /// The message.
        message: Message,
    },
    /// A status line not tied to a buffer.
    DisplayStatusMessage {
        /// Network name the status refers to.
        network: String,
        /// Status text.
        message: String,
    },
    /// Reply to a heartbeat, carrying the measured round trip.
    HeartBeatReply {
        /// Round trip in milliseconds.
        latency_ms: u64,
    },
}

impl InboundCall {
    /// Short static label, used for spans and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundCall::InitResponse { .. } => "init_response",
            InboundCall::Mutation { .. } => "mutation",
            InboundCall::Rename { .. } => "rename",
            InboundCall::NetworkCreated { .. } => "network_created",
            InboundCall::NetworkRemoved { .. } => "network_removed",
            InboundCall::IdentityCreated { .. } => "identity_created",
            InboundCall::IdentityRemoved { .. } => "identity_removed",
            InboundCall::BufferInfoUpdated { .. } => "buffer_info_updated",
            InboundCall::BufferRemoved { .. } => "buffer_removed",
            InboundCall::BufferRenamed { .. } => "buffer_renamed",
            InboundCall::PasswordChangeResult { .. } => "password_change_result",
            InboundCall::BacklogReceived { .. } => "backlog_received",
            InboundCall::DisplayMessage { .. } => "display_message",
            InboundCall::DisplayStatusMessage { .. } => "display_status_message",
            InboundCall::HeartBeatReply { .. } => "heart_beat_reply",
        }
    }
}

/// Remote procedure calls a client may issue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "method", rename_all = "snake_case"))]
pub enum RpcCall {
    /// Send a line of user input to a buffer.
    SendInput {
        /// Target buffer.
        buffer: BufferInfo,
        /// Raw input, possibly a `/command`.
        text: String,
    },
}

impl RpcCall {
    /// Signature the core dispatches on.
    pub fn signature(&self) -> &'static str {
        match self {
            RpcCall::SendInput { .. } => "2sendInput(BufferInfo,QString)",
        }
    }
}

/// A call a session hands to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum OutboundCall {
    /// Ask for the full state of an object.
    InitRequest {
        /// Object type tag.
        type_tag: TypeTag,
        /// Object name.
        name: String,
    },
    /// Ask for the most recent history of a buffer.
    BacklogRequest {
        /// Buffer to fetch.
        buffer_id: BufferId,
        /// Number of messages, zero for the core's default.
        amount: i32,
    },
    /// A user-triggered remote procedure call.
    Rpc {
        /// The call.
        call: RpcCall,
    },
}

impl OutboundCall {
    /// Short static label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundCall::InitRequest { .. } => "init_request",
            OutboundCall::BacklogRequest { .. } => "backlog_request",
            OutboundCall::Rpc { .. } => "rpc",
        }
    }
}

/// What a transport reports to a session, in arrival order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum TransportEvent {
    /// Connection attempt started.
    Connecting,
    /// Login accepted; the core handed over its session state.
    Established {
        /// Session state to seed from.
        state: SessionState,
    },
    /// A call from the core.
    Call {
        /// The call.
        call: InboundCall,
    },
    /// Connection lost or closed.
    Lost,
}
