//! quassel-session - client-side session synchronization engine
//!
//! Mirrors core-owned objects into local replicas, keeps them consistent as
//! mutation calls arrive, and drives the bootstrap from connect to a usable
//! session. Transport and wire decoding live outside this crate; it consumes
//! the typed records of [`quassel_proto`].
//!
//! ```
//! use std::sync::Arc;
//! use quassel_session::{ConnectionPhase, Session, SessionConfig};
//! use quassel_session::storage::NoOpStorage;
//!
//! let (mut session, _channels) = Session::new(SessionConfig::default(), Arc::new(NoOpStorage));
//! session.connect().unwrap();
//! assert_eq!(session.phase(), ConnectionPhase::Connecting);
//! ```

pub mod buffers;
pub mod config;
pub mod deferred;
pub mod error;
pub mod metrics;
pub mod model;
pub mod phase;
pub mod registry;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod tracker;

pub use config::{Config, SessionConfig};
pub use error::{SyncError, SyncResult};
pub use phase::ConnectionPhase;
pub use session::{Session, SessionChannels, SessionEvent, SessionReader, SessionSnapshot};
