//! Bootstrap tuning.

use serde::Deserialize;

use super::types::default_true;

/// Session bootstrap configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// `amount` sent with every bootstrap backlog request. Zero lets the
    /// core pick its default page size.
    #[serde(default)]
    pub initial_backlog_amount: i32,
    /// Request the initial state of every seeded network. These requests do
    /// not gate the bootstrap.
    #[serde(default = "default_true")]
    pub request_network_init: bool,
    /// Whether buffer view configs requested during data initialization must
    /// arrive before backlog loading starts.
    #[serde(default = "default_true")]
    pub track_buffer_view_configs: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_backlog_amount: 0,
            request_network_init: true,
            track_buffer_view_configs: true,
        }
    }
}
