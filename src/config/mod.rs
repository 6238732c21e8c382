//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level [`Config`], loading, metrics and replay sections
//! - [`session`]: Bootstrap tuning (SessionConfig)
//! - [`logging`]: Log filter and output format (LoggingConfig)

mod logging;
mod session;
mod types;

pub use logging::{LogFormat, LoggingConfig};
pub use session::SessionConfig;
pub use types::{Config, ConfigError, MetricsConfig, ReplayConfig};
