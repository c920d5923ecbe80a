//! Session history statistics
//!
//! Aggregates completed sessions into totals and averages:
//! - Total sessions, focus time and switches
//! - Average session length and switches per session
//! - Perfect (switch-free) sessions and switch rate per hour

use serde::Serialize;

use crate::session::SessionSummary;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Aggregated statistics over a set of sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    /// Total number of sessions
    pub total_sessions: u32,
    /// Sessions without a single switch
    pub perfect_sessions: u32,
    /// Total focus time in milliseconds
    pub total_ms: u64,
    /// Total context switches
    pub total_switches: u32,
    /// Average session length in milliseconds
    pub average_ms: u64,
    /// Average switches per session
    pub average_switches: f64,
    /// Switches per hour of focus time
    pub switches_per_hour: f64,
}

impl HistoryStats {
    /// Calculate statistics from a list of summaries
    pub fn from_summaries(summaries: &[SessionSummary]) -> Self {
        if summaries.is_empty() {
            return Self::default();
        }

        let total_sessions = summaries.len() as u32;
        let perfect_sessions = summaries.iter().filter(|s| s.is_perfect()).count() as u32;
        let total_ms: u64 = summaries.iter().map(|s| s.duration_ms).sum();
        let total_switches: u32 = summaries.iter().map(|s| s.switches).sum();

        let switches_per_hour = if total_ms > 0 {
            total_switches as f64 / (total_ms as f64 / MS_PER_HOUR)
        } else {
            0.0
        };

        Self {
            total_sessions,
            perfect_sessions,
            total_ms,
            total_switches,
            average_ms: total_ms / total_sessions as u64,
            average_switches: total_switches as f64 / total_sessions as f64,
            switches_per_hour,
        }
    }

    /// Get total hours and minutes as a tuple
    pub fn total_time(&self) -> (u64, u64) {
        let total_minutes = self.total_ms / 60_000;
        (total_minutes / 60, total_minutes % 60)
    }
}
