//! Application state and event handling

use crossterm::event::{Event, KeyCode, KeyEventKind};
use tracing::{debug, info, warn};

use switchtrack::{HistoryStats, Phase, SessionTracker};

/// Everything the event loop reacts to, in delivery order
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic timer fired
    Tick,
    /// Terminal input, including focus changes
    Input(Event),
}

/// Application state
pub struct App {
    pub tracker: SessionTracker,
    pub history_display: usize,
    pub show_help: bool,
    pub should_quit: bool,
    /// Whether the terminal has ever reported a focus change
    pub focus_seen: bool,
}

impl App {
    pub fn new(tracker: SessionTracker, history_display: usize) -> Self {
        Self {
            tracker,
            history_display,
            show_help: false,
            should_quit: false,
            focus_seen: false,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.tracker.tick(),
            AppEvent::Input(Event::FocusLost) => {
                self.focus_seen = true;
                self.tracker.on_visibility_hidden();
            }
            AppEvent::Input(Event::FocusGained) => {
                self.focus_seen = true;
                self.tracker.on_visibility_visible();
            }
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key.code)
            }
            AppEvent::Input(_) => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Enter => self.toggle_session(),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Start when nothing is running, stop otherwise
    ///
    /// The only path the UI has into `start`/`stop`, so it never asks the
    /// tracker for an invalid transition.
    pub fn toggle_session(&mut self) {
        let result = match self.tracker.phase() {
            Phase::Active => self.tracker.stop().map(|_| ()),
            Phase::Idle | Phase::Stopped => self.tracker.start(),
        };
        if let Err(e) = result {
            warn!(error = %e, "session toggle rejected");
        }
    }

    /// Close out an active session before the dashboard exits
    pub fn finish(&mut self) {
        if self.tracker.phase().is_active() {
            info!("stopping active session on exit");
            if let Err(e) = self.tracker.stop() {
                warn!(error = %e, "failed to stop session on exit");
            }
        }
        debug!(sessions = self.tracker.history().len(), "dashboard closed");
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_summaries(&self.tracker.history().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use switchtrack::ManualClock;

    fn app() -> (App, ManualClock) {
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(clock.clone());
        (App::new(tracker, 10), clock)
    }

    fn key(c: char) -> AppEvent {
        AppEvent::Input(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    #[test]
    fn test_space_toggles_session() {
        let (mut app, clock) = app();

        app.handle_event(key(' '));
        assert_eq!(app.tracker.phase(), Phase::Active);

        clock.set_ms(1_200);
        app.handle_event(key(' '));
        assert_eq!(app.tracker.phase(), Phase::Stopped);
        assert_eq!(app.tracker.last_summary().map(|s| s.duration_ms), Some(1_200));

        app.handle_event(key('s'));
        assert_eq!(app.tracker.phase(), Phase::Active);
    }

    #[test]
    fn test_enter_toggles_session() {
        let (mut app, _) = app();
        let enter =
            || AppEvent::Input(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));

        app.handle_event(enter());
        assert_eq!(app.tracker.phase(), Phase::Active);
        app.handle_event(enter());
        assert_eq!(app.tracker.phase(), Phase::Stopped);
    }

    #[test]
    fn test_focus_events_count_switches() {
        let (mut app, _) = app();
        app.handle_event(key(' '));

        app.handle_event(AppEvent::Input(Event::FocusLost));
        app.handle_event(AppEvent::Input(Event::FocusGained));
        app.handle_event(AppEvent::Input(Event::FocusGained));

        assert!(app.focus_seen);
        assert_eq!(app.tracker.switch_count(), 1);
    }

    #[test]
    fn test_tick_updates_elapsed() {
        let (mut app, clock) = app();
        app.handle_event(key(' '));

        clock.set_ms(3_300);
        app.handle_event(AppEvent::Tick);
        assert_eq!(app.tracker.elapsed_ms(), 3_300);
    }

    #[test]
    fn test_quit_and_help_keys() {
        let (mut app, _) = app();

        app.handle_event(key('?'));
        assert!(app.show_help);
        app.handle_event(key('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_finish_records_active_session() {
        let (mut app, clock) = app();
        app.handle_event(key(' '));
        clock.set_ms(900);

        app.finish();
        assert_eq!(app.tracker.history().len(), 1);
        assert_eq!(app.stats().total_ms, 900);

        // finishing again is harmless
        app.finish();
        assert_eq!(app.tracker.history().len(), 1);
    }
}
