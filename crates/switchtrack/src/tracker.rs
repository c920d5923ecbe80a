//! Session state machine
//!
//! Owns the lifecycle (idle → active → stopped), derives elapsed time from
//! the start instant, and counts context switches on the hidden → visible
//! edge. All methods run to completion on the caller's thread; the event loop
//! feeding them must deliver visibility events in arrival order.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::history::History;
use crate::notify::{NotificationSink, NullSink};
use crate::schedule::{NoopScheduler, ScheduleHandle, Scheduler};
use crate::session::{Phase, SessionError, SessionSummary, Snapshot, SwitchEvent};

/// Tracks one focus session at a time and the history of finished ones
pub struct SessionTracker {
    clock: Box<dyn Clock>,
    sink: Box<dyn NotificationSink>,
    scheduler: Box<dyn Scheduler>,

    phase: Phase,
    start_instant: Option<Instant>,
    elapsed_ms: u64,
    switch_count: u32,
    pending_away: bool,
    ticks: Option<ScheduleHandle>,

    last_summary: Option<SessionSummary>,
    history: History,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl SessionTracker {
    /// Create an idle tracker with no cue and no timer
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            sink: Box::new(NullSink),
            scheduler: Box::new(NoopScheduler),
            phase: Phase::Idle,
            start_instant: None,
            elapsed_ms: 0,
            switch_count: 0,
            pending_away: false,
            ticks: None,
            last_summary: None,
            history: History::new(),
        }
    }

    /// Set the sink notified on each counted switch
    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Set the sink from an already boxed value
    pub fn with_boxed_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Set the scheduler that drives `tick` while a session runs
    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    /// Begin a new session from idle or stopped
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase.is_active() {
            return Err(SessionError::InvalidTransition {
                action: "start",
                phase: self.phase,
            });
        }

        self.phase = Phase::Active;
        self.start_instant = Some(self.clock.now());
        self.elapsed_ms = 0;
        self.switch_count = 0;
        self.pending_away = false;
        self.last_summary = None;
        self.ticks = Some(self.scheduler.schedule());

        info!(session = self.history.len() + 1, "session started");
        Ok(())
    }

    /// Recompute elapsed time from the clock
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.tick_at(now);
    }

    /// Recompute elapsed time as of `now`
    ///
    /// Elapsed time is always `now - start`, never a running sum, so late or
    /// skipped ticks cannot introduce drift. Ignored outside an active session.
    pub fn tick_at(&mut self, now: Instant) {
        if !self.phase.is_active() {
            return;
        }
        if let Some(start) = self.start_instant {
            let derived = now.saturating_duration_since(start).as_millis() as u64;
            // never run backwards if a caller hands us an older instant
            self.elapsed_ms = self.elapsed_ms.max(derived);
        }
    }

    /// The monitored surface was hidden
    pub fn on_visibility_hidden(&mut self) {
        if !self.phase.is_active() || self.pending_away {
            return;
        }
        self.pending_away = true;
        debug!("surface hidden");
    }

    /// The monitored surface became visible again
    ///
    /// Counts a switch only when it closes a hidden → visible round trip.
    pub fn on_visibility_visible(&mut self) {
        if !self.phase.is_active() || !self.pending_away {
            return;
        }

        self.pending_away = false;
        self.switch_count += 1;
        self.tick();

        let event = SwitchEvent {
            count: self.switch_count,
            elapsed_ms: self.elapsed_ms,
        };
        debug!(count = event.count, elapsed_ms = event.elapsed_ms, "context switch counted");

        if let Err(e) = self.sink.notify(&event) {
            warn!(error = %e, "switch notification failed");
        }
    }

    /// End the active session and record its summary
    pub fn stop(&mut self) -> Result<&SessionSummary, SessionError> {
        if !self.phase.is_active() {
            return Err(SessionError::InvalidTransition {
                action: "stop",
                phase: self.phase,
            });
        }

        self.tick();
        if let Some(ticks) = self.ticks.take() {
            ticks.cancel();
        }
        self.phase = Phase::Stopped;
        self.pending_away = false;

        let summary = SessionSummary {
            duration_ms: self.elapsed_ms,
            switches: self.switch_count,
            timestamp: self.clock.wall(),
        };
        info!(
            duration_ms = summary.duration_ms,
            switches = summary.switches,
            "session stopped"
        );

        self.history.append(summary.clone());
        Ok(&*self.last_summary.insert(summary))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }

    /// Whether the surface is currently away during an active session
    pub fn is_away(&self) -> bool {
        self.pending_away
    }

    /// Whether a tick schedule is currently held
    pub fn is_ticking(&self) -> bool {
        self.ticks.is_some()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            elapsed_ms: self.elapsed_ms,
            switch_count: self.switch_count,
        }
    }

    /// Summary of the session that just ended, cleared by the next start
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
