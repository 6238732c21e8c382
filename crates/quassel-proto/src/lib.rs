//! # quassel-proto
//!
//! Typed record shapes for the Quassel client/core synchronization protocol.
//!
//! This crate does not encode or decode wire bytes. It describes the decoded
//! records a transport hands to a client session, and the records a session
//! hands back to the transport:
//!
//! - Object identifiers: [`TypeTag`], scoped names (`"<networkId>/<child>"`)
//!   and the [`InitKey`] join key (`"<TypeTag>:<name>"`)
//! - Property payloads: [`Value`] and [`FieldMap`]
//! - Descriptors pushed by the core: [`BufferInfo`], [`Message`], [`SessionState`]
//! - Calls: [`InboundCall`], [`OutboundCall`], and the [`TransportEvent`]
//!   envelope used by replay tooling
//!
//! ## Quick Start
//!
//! ```rust
//! use quassel_proto::{split_scoped, InitKey, NetworkId, TypeTag};
//!
//! let tag: TypeTag = "IrcChannel".parse().unwrap();
//! let (network, channel) = split_scoped("1/#quassel").unwrap();
//! assert_eq!(network, NetworkId(1));
//! assert_eq!(channel, "#quassel");
//! assert_eq!(InitKey::new(tag, "1/#quassel").as_str(), "IrcChannel:1/#quassel");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod buffer;
pub mod call;
pub mod error;
pub mod ident;
pub mod ids;
pub mod message;
pub mod state;
pub mod value;

pub use self::buffer::{BufferInfo, BufferKind};
pub use self::call::{InboundCall, OutboundCall, RpcCall, TransportEvent};
pub use self::error::ProtoError;
pub use self::ident::{parse_id, split_scoped, InitKey, TypeTag, SCOPE_SEPARATOR};
pub use self::ids::{BufferId, IdentityId, MsgId, NetworkId};
pub use self::message::Message;
pub use self::state::SessionState;
pub use self::value::{FieldMap, Value};
