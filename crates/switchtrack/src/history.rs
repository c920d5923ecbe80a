//! In-memory session history
//!
//! Newest summary first. Nothing is persisted; the log lives as long as the
//! process does.

use std::collections::VecDeque;

use crate::session::SessionSummary;

/// Append-only log of completed sessions
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<SessionSummary>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summary as the most recent entry
    pub(crate) fn append(&mut self, summary: SessionSummary) {
        self.entries.push_front(summary);
    }

    /// All summaries, most recent first
    pub fn all(&self) -> impl ExactSizeIterator<Item = &SessionSummary> + DoubleEndedIterator {
        self.entries.iter()
    }

    /// The most recently recorded summary
    pub fn latest(&self) -> Option<&SessionSummary> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy in display order, for reports and statistics
    pub fn to_vec(&self) -> Vec<SessionSummary> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(duration_ms: u64) -> SessionSummary {
        SessionSummary {
            duration_ms,
            switches: 0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.all().count(), 0);
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::new();
        history.append(summary(1));
        history.append(summary(2));
        history.append(summary(3));

        let durations: Vec<u64> = history.all().map(|s| s.duration_ms).collect();
        assert_eq!(durations, vec![3, 2, 1]);
        assert_eq!(history.latest().map(|s| s.duration_ms), Some(3));
        assert_eq!(history.len(), 3);
    }
}
