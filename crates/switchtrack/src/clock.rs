//! Clock sources
//!
//! The tracker reads two kinds of time: a monotonic instant for elapsed-time
//! math and a wall-clock timestamp for session summaries.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Supplies the current time
pub trait Clock {
    /// Monotonic reading used for elapsed time
    fn now(&self) -> Instant;

    /// Wall-clock reading used to stamp summaries
    fn wall(&self) -> DateTime<Utc>;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the tracker.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    base_wall: DateTime<Utc>,
    offset_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            base_wall: Utc::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Jump to an absolute offset (milliseconds since the clock was created)
    pub fn set_ms(&self, ms: u64) {
        self.offset_ms.store(ms, Ordering::SeqCst);
    }

    /// Move forward by `ms` milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Current offset in milliseconds
    pub fn offset_ms(&self) -> u64 {
        self.offset_ms.load(Ordering::SeqCst)
    }

    /// The instant corresponding to an offset
    pub fn instant_at(&self, ms: u64) -> Instant {
        self.base + Duration::from_millis(ms)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.instant_at(self.offset_ms())
    }

    fn wall(&self) -> DateTime<Utc> {
        self.base_wall + chrono::Duration::milliseconds(self.offset_ms() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();

        clock.advance_ms(250);
        assert_eq!(other.now().duration_since(start), Duration::from_millis(250));

        clock.set_ms(1000);
        assert_eq!(other.offset_ms(), 1000);
    }

    #[test]
    fn test_manual_wall_tracks_offset() {
        let clock = ManualClock::new();
        let before = clock.wall();
        clock.advance_ms(1500);
        assert_eq!((clock.wall() - before).num_milliseconds(), 1500);
    }
}
