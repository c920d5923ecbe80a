//! switchtrack - Focus session timer with context-switch counting
//!
//! Measures how long a focus session runs and how many times attention left
//! the monitored surface and came back. Provides:
//! - A session state machine (idle, active, stopped) with drift-free timing
//! - Edge-triggered switch counting: only a hidden → visible round trip counts
//! - An in-memory, newest-first history of session summaries
//! - Pluggable notification sinks and tick schedulers
//!
//! Commands:
//! - run: Open the dashboard and track sessions (default)
//! - config: Show or initialise the configuration file

pub mod clock;
pub mod history;
pub mod notify;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use history::History;
pub use notify::NotificationSink;
pub use schedule::{ScheduleHandle, Scheduler};
pub use session::{Phase, SessionError, SessionSummary, Snapshot, SwitchEvent};
pub use stats::HistoryStats;
pub use tracker::SessionTracker;
