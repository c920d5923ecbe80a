//! switchtrack - Focus session timer that counts context switches
//!
//! "Measure the cost of distraction."
//!
//! Usage:
//!   switchtrack                     Open the dashboard
//!   switchtrack run --cue desktop   Open the dashboard with desktop notifications
//!   switchtrack run --json          Print the exit report as JSON
//!   switchtrack config              Show the effective configuration
//!   switchtrack config --init       Write the default configuration file

mod app;
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor::Show,
    event::{self, DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use switchtrack::notify::sink_for;
use switchtrack::schedule::IntervalScheduler;
use switchtrack::{HistoryStats, SessionSummary, SessionTracker};
use switchtrack_core::{format, Config, CueKind, Paths};

use app::{App, AppEvent};

/// How often the input thread checks whether the dashboard has closed
const INPUT_POLL: Duration = Duration::from_millis(250);

/// switchtrack - Focus session timer that counts context switches
#[derive(Parser)]
#[command(name = "switchtrack")]
#[command(about = "Focus session timer that counts context switches away from the terminal")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Before a block of focused work. Start a session, work, stop it, and
    see how long you stayed and how often you left the terminal.

HOW SWITCHES ARE COUNTED:
    A switch is one full round trip: the terminal loses focus and later
    regains it while a session is running. Leaving and not coming back
    before you stop does not count. Requires a terminal that reports
    focus changes (most modern terminals and tmux with focus-events on).

EXAMPLES:
    switchtrack                     # Open the dashboard
    switchtrack run --cue none      # No bell on switches
    switchtrack run --interval 250  # Slower timer refresh
    switchtrack run --json          # JSON report on exit
    switchtrack config --init       # Write default config

KEY BINDINGS:
    Space, s, Enter  Start or stop a session
    ?                Toggle help overlay
    q, Esc           Quit and print the report
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the session dashboard
    #[command(alias = "r")]
    Run(RunArgs),

    /// Show or initialise the configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Timer refresh interval in milliseconds
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// Cue on each counted switch: bell, desktop or none
    #[arg(long)]
    cue: Option<CueKind>,

    /// Print the exit report as JSON
    #[arg(long)]
    json: bool,
}

/// Exit report printed once the dashboard closes
#[derive(Serialize)]
struct Report {
    sessions: Vec<SessionSummary>,
    stats: HistoryStats,
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new();

    match cli.command {
        Some(Commands::Run(args)) => cmd_run(&paths, args).await,
        Some(Commands::Config { init }) => cmd_config(&paths, init),
        None => cmd_run(&paths, RunArgs::default()).await,
    }
}

/// Send tracing output to a log file; the terminal belongs to the dashboard
fn init_logging(paths: &Paths) -> Result<()> {
    paths.ensure_data_dir()?;
    let log_path = paths.log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the dashboard until the user quits, then print the report
async fn cmd_run(paths: &Paths, args: RunArgs) -> Result<()> {
    init_logging(paths)?;

    let mut config = Config::load(&paths.config_file())?;
    if let Some(interval) = args.interval {
        config.tick_interval_ms = interval;
    }
    if let Some(cue) = args.cue {
        config.cue = cue;
    }
    let interval = Duration::from_millis(config.tick_interval_ms.max(1));
    info!(interval_ms = interval.as_millis() as u64, cue = %config.cue, "starting dashboard");

    let (tx, rx) = mpsc::unbounded_channel();
    let tracker = SessionTracker::default()
        .with_boxed_sink(sink_for(config.cue))
        .with_scheduler(IntervalScheduler::new(interval, tx.clone(), AppEvent::Tick));
    let mut app = App::new(tracker, config.history_display);

    install_panic_hook();
    let result = {
        let _guard = TerminalGuard::enter()?;
        let mut terminal =
            Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")?;

        spawn_input_thread(tx);
        run_app(&mut terminal, &mut app, rx).await
    };

    app.finish();
    result?;

    print_report(&app, args.json)
}

/// Raw mode, alternate screen and focus reporting, undone on drop
///
/// Dropping the guard restores the terminal on every exit path: normal quit,
/// an early `?` during setup, or unwinding from a panic.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, EnableFocusChange)
            .context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Put the terminal back into its normal state, ignoring failures
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableFocusChange, LeaveAlternateScreen, Show);
}

/// Restore the terminal before the panic message is printed
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

/// Forward terminal events to the event loop in arrival order
fn spawn_input_thread(tx: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(AppEvent::Input(ev)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "terminal read failed");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, "terminal poll failed");
                    break;
                }
            }
        }
    });
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let Some(event) = rx.recv().await else {
            return Ok(());
        };
        app.handle_event(event);

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_report(app: &App, json: bool) -> Result<()> {
    let report = Report {
        sessions: app.tracker.history().to_vec(),
        stats: app.stats(),
    };

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    if report.sessions.is_empty() {
        println!("No sessions recorded");
        return Ok(());
    }

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "SESSION REPORT"));
    println!();
    for (i, s) in report.sessions.iter().enumerate() {
        println!(
            "  #{:<3} {}  {:>3} switches  {}",
            report.sessions.len() - i,
            format::clock(s.duration_ms),
            s.switches,
            s.timestamp.to_rfc3339()
        );
    }

    let stats = &report.stats;
    let (hours, mins) = stats.total_time();
    println!();
    println!("  {}    {}", color(CYAN, "Total Sessions:"), stats.total_sessions);
    println!("  {}  {}h {}m", color(CYAN, "Total Focus Time:"), hours, mins);
    println!(
        "  {}   {}",
        color(CYAN, "Average Session:"),
        format::duration(stats.average_ms as f64 / 1000.0)
    );
    println!(
        "  {}    {} ({:.1} per session, {:.1} per hour)",
        color(CYAN, "Total Switches:"),
        stats.total_switches,
        stats.average_switches,
        stats.switches_per_hour
    );
    println!(
        "  {}  {}",
        color(CYAN, "Perfect Sessions:"),
        color(GREEN, &stats.perfect_sessions.to_string())
    );

    Ok(())
}

/// Show the effective configuration, optionally writing defaults first
fn cmd_config(paths: &Paths, init: bool) -> Result<()> {
    let path = paths.config_file();

    if init {
        if path.exists() {
            println!("{} Config already exists: {}", color(CYAN, "[info]"), path.display());
        } else {
            Config::default().save(&path)?;
            println!("{} Wrote default config: {}", color(GREEN, "[ok]"), path.display());
        }
    }

    let config = Config::load(&path)?;
    println!("{}", color(BOLD, "Configuration"));
    println!();
    println!("  {}  {}", color(CYAN, "File:"), path.display());
    println!("  {}  {} ms", color(CYAN, "Tick interval:"), config.tick_interval_ms);
    println!("  {}  {}", color(CYAN, "Cue:"), config.cue);
    println!("  {}  {}", color(CYAN, "History rows:"), config.history_display);

    Ok(())
}
