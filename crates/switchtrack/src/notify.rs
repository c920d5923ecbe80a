//! Switch notification sinks
//!
//! The tracker calls a sink once per counted context switch. Sinks may fail
//! (no notifier installed, closed terminal); the tracker logs the failure and
//! keeps counting.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::warn;

use switchtrack_core::CueKind;

use crate::session::SwitchEvent;

/// Receiver of "switch counted" notifications
pub trait NotificationSink {
    fn notify(&self, event: &SwitchEvent) -> Result<()>;
}

/// Build the sink matching a configured cue
pub fn sink_for(cue: CueKind) -> Box<dyn NotificationSink> {
    match cue {
        CueKind::Bell => Box::new(BellSink),
        CueKind::Desktop => Box::new(DesktopSink::detect()),
        CueKind::None => Box::new(NullSink),
    }
}

/// Ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: &SwitchEvent) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell
#[derive(Debug, Clone, Copy, Default)]
pub struct BellSink;

impl NotificationSink for BellSink {
    fn notify(&self, _event: &SwitchEvent) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07").context("Failed to ring terminal bell")?;
        stdout.flush().context("Failed to flush terminal bell")
    }
}

/// Desktop notification backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// macOS osascript
    Osascript,
    /// Linux notify-send
    NotifySend,
    /// Nothing usable found
    Unavailable,
}

impl Backend {
    /// Detect the best available backend for the current platform
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            return Self::Osascript;
        }
        if cfg!(target_os = "linux") && command_exists("notify-send") {
            return Self::NotifySend;
        }
        Self::Unavailable
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Osascript => "osascript",
            Self::NotifySend => "notify-send",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Check if a command exists
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Pops a desktop notification for each switch
///
/// The notifier runs as a detached child and is reaped on a helper thread,
/// so a notifier stuck on D-Bus never holds up the event loop.
#[derive(Debug, Clone)]
pub struct DesktopSink {
    backend: Backend,
    /// Executable to run instead of the backend's default
    program: Option<String>,
}

impl DesktopSink {
    pub fn detect() -> Self {
        Self::with_backend(Backend::detect())
    }

    pub fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            program: None,
        }
    }

    /// Use `program` as the notifier executable, keeping the backend's arguments
    pub fn with_program(backend: Backend, program: impl Into<String>) -> Self {
        Self {
            backend,
            program: Some(program.into()),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    fn message(event: &SwitchEvent) -> String {
        format!(
            "Context switch #{} at {}",
            event.count,
            switchtrack_core::format::clock(event.elapsed_ms)
        )
    }

    fn command(&self, event: &SwitchEvent) -> Result<Command> {
        let title = "switchtrack";
        let message = Self::message(event);
        let program = self
            .program
            .clone()
            .unwrap_or_else(|| self.backend.name().to_string());

        let mut cmd = Command::new(program);
        match self.backend {
            Backend::Osascript => {
                let script = format!(
                    r#"display notification "{}" with title "{}" sound name "default""#,
                    message.replace('"', r#"\""#),
                    title
                );
                cmd.args(["-e", &script]);
            }
            Backend::NotifySend => {
                cmd.args(["--expire-time", "2000", title, &message]);
            }
            Backend::Unavailable => bail!("no desktop notification backend available"),
        }

        cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        Ok(cmd)
    }
}

impl NotificationSink for DesktopSink {
    fn notify(&self, event: &SwitchEvent) -> Result<()> {
        let mut child = self
            .command(event)?
            .spawn()
            .with_context(|| format!("Failed to run {}", self.backend.name()))?;

        let name = self.backend.name();
        thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                warn!(backend = name, %status, "desktop notification failed");
            }
            Ok(_) => {}
            Err(e) => warn!(backend = name, error = %e, "desktop notification wait failed"),
        });
        Ok(())
    }
}

/// Keeps every event it receives; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SwitchEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SwitchEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &SwitchEvent) -> Result<()> {
        match self.events.lock() {
            Ok(mut events) => {
                events.push(*event);
                Ok(())
            }
            Err(_) => bail!("recording sink lock poisoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(count: u32) -> SwitchEvent {
        SwitchEvent {
            count,
            elapsed_ms: 65_000,
        }
    }

    #[test]
    fn test_recording_sink_shares_log() {
        let sink = RecordingSink::new();
        let observer = sink.clone();

        sink.notify(&event(1)).unwrap();
        sink.notify(&event(2)).unwrap();

        assert_eq!(observer.count(), 2);
        assert_eq!(observer.events()[1].count, 2);
    }

    #[test]
    fn test_unavailable_backend_errors() {
        let sink = DesktopSink::with_backend(Backend::Unavailable);
        assert!(sink.notify(&event(1)).is_err());
    }

    #[test]
    fn test_desktop_message() {
        assert_eq!(DesktopSink::message(&event(4)), "Context switch #4 at 00:01:05");
    }

    #[test]
    fn test_missing_notifier_errors() {
        let sink = DesktopSink::with_program(Backend::NotifySend, "/nonexistent/notify-send");
        assert!(sink.notify(&event(1)).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_notifier_returns_immediately() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("notify-send");
        std::fs::write(&script, "#!/bin/sh\nsleep 2\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let sink = DesktopSink::with_program(Backend::NotifySend, script.to_string_lossy());
        let started = Instant::now();
        sink.notify(&event(1)).unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_null_sink() {
        assert!(NullSink.notify(&event(1)).is_ok());
    }
}
