//! Session types
//!
//! The lifecycle phase, the summary recorded when a session stops, and the
//! read-only views handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle phase of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No session has been started yet
    #[default]
    Idle,
    /// A session is running
    Active,
    /// The last session has ended; its summary is still on display
    Stopped,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Active => "active",
            Phase::Stopped => "stopped",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Active)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by lifecycle transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} a session while {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },
}

/// Record of a completed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Elapsed time at stop, in milliseconds
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    /// Completed context switches
    pub switches: u32,
    /// When the session was stopped
    pub timestamp: DateTime<Utc>,
}

impl SessionSummary {
    /// Whether the session ran without a single switch
    pub fn is_perfect(&self) -> bool {
        self.switches == 0
    }

    /// One-line feedback shown under the summary
    pub fn verdict(&self) -> &'static str {
        if self.is_perfect() {
            "Perfect focus! No interruptions detected."
        } else {
            "Try to minimize context switching next time."
        }
    }
}

/// Point-in-time view of the running (or last) session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub elapsed_ms: u64,
    pub switch_count: u32,
}

/// Payload delivered to the notification sink for each counted switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchEvent {
    /// Switch count after this switch
    pub count: u32,
    /// Elapsed session time when the surface became visible again
    pub elapsed_ms: u64,
}
