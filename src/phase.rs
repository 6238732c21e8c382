//! Connection phase state machine.
//!
//! Phases only move forward, one step at a time, except that any phase can
//! fall back to [`ConnectionPhase::Disconnected`] when the transport is lost.
//! The machine is sans-IO: it validates and records transitions, and the
//! session decides what to do on entry.

use std::fmt;

use serde::Serialize;

use crate::error::SyncError;

/// Bootstrap phase of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionPhase {
    /// No transport, no state.
    #[default]
    Disconnected,
    /// Transport is connecting or logging in.
    Connecting,
    /// Waiting for the initial state of the singleton objects.
    InitializingData,
    /// Waiting for the first history page of every buffer.
    LoadingBacklog,
    /// Fully bootstrapped.
    Connected,
}

impl ConnectionPhase {
    /// Static label, used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::InitializingData => "initializing_data",
            Self::LoadingBacklog => "loading_backlog",
            Self::Connected => "connected",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            Self::Disconnected => Some(Self::Connecting),
            Self::Connecting => Some(Self::InitializingData),
            Self::InitializingData => Some(Self::LoadingBacklog),
            Self::LoadingBacklog => Some(Self::Connected),
            Self::Connected => None,
        }
    }

    /// Whether `self -> to` is a legal transition.
    pub fn can_transition_to(&self, to: ConnectionPhase) -> bool {
        if to == Self::Disconnected {
            return *self != Self::Disconnected;
        }
        self.next() == Some(to)
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transition that was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: ConnectionPhase,
    pub to: ConnectionPhase,
}

/// Holds the current phase and enforces transition rules.
#[derive(Debug, Default)]
pub struct PhaseMachine {
    phase: ConnectionPhase,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Move to `to`, or fail without changing anything.
    pub fn transition(&mut self, to: ConnectionPhase) -> Result<PhaseChange, SyncError> {
        let from = self.phase;
        if !from.can_transition_to(to) {
            return Err(SyncError::InvalidTransition { from, to });
        }
        self.phase = to;
        crate::metrics::record_phase_transition(to.as_str());
        Ok(PhaseChange { from, to })
    }
}
