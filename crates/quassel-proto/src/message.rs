//! Chat messages delivered as backlog or live traffic.

use chrono::{DateTime, TimeZone, Utc};

use crate::ids::{BufferId, MsgId};

/// A single stored message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Message id, monotonically increasing per core.
    pub msg_id: MsgId,
    /// Buffer the message belongs to.
    pub buffer_id: BufferId,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Message type flags as sent by the core.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: u32,
    /// Message flags (self, highlight, backlog, ...).
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: u8,
    /// `nick!user@host` of the sender.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sender: String,
    /// Message text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: String,
}

impl Message {
    /// Timestamp as a UTC date, `None` when out of range.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }

    /// Nick part of the sender prefix.
    pub fn sender_nick(&self) -> &str {
        self.sender
            .split_once('!')
            .map_or(self.sender.as_str(), |(nick, _)| nick)
    }
}
