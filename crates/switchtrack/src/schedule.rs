//! Periodic tick scheduling
//!
//! A running session holds a [`ScheduleHandle`]; releasing the handle stops
//! the ticks. Handles release themselves on drop, so every way out of the
//! active phase (stop, tracker teardown, a panic unwinding the event loop)
//! cancels the timer.

use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Something that can start a periodic tick on demand
pub trait Scheduler {
    /// Begin ticking; ticks continue until the handle is released
    fn schedule(&self) -> ScheduleHandle;
}

/// Cancellable handle for a running schedule
pub struct ScheduleHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduleHandle {
    /// Wrap the action that stops the schedule
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Stop the schedule now
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleHandle")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// Scheduler for callers that drive `tick` themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScheduler;

impl Scheduler for NoopScheduler {
    fn schedule(&self) -> ScheduleHandle {
        ScheduleHandle::noop()
    }
}

/// Sends `message` on a channel every `period` from a tokio task
///
/// Must be scheduled from inside a tokio runtime. Late ticks are skipped
/// rather than bunched up; the receiver recomputes elapsed time from the
/// clock, so a skipped tick loses nothing.
pub struct IntervalScheduler<M> {
    period: Duration,
    tx: UnboundedSender<M>,
    message: M,
}

impl<M: Clone + Send + 'static> IntervalScheduler<M> {
    pub fn new(period: Duration, tx: UnboundedSender<M>, message: M) -> Self {
        Self { period, tx, message }
    }
}

impl<M: Clone + Send + 'static> Scheduler for IntervalScheduler<M> {
    fn schedule(&self) -> ScheduleHandle {
        let period = self.period;
        let tx = self.tx.clone();
        let message = self.message.clone();

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(message.clone()).is_err() {
                    break;
                }
            }
        });
        debug!(period_ms = period.as_millis() as u64, "tick schedule started");

        ScheduleHandle::new(move || {
            task.abort();
            debug!("tick schedule cancelled");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[test]
    fn test_handle_cancels_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = ScheduleHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handle.cancel();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handle_cancels_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        {
            let _handle = ScheduleHandle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_interval_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = IntervalScheduler::new(Duration::from_millis(5), tx, ());

        let handle = scheduler.schedule();
        for _ in 0..3 {
            time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("tick should arrive")
                .expect("channel open");
        }

        handle.cancel();
        time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}

        time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
