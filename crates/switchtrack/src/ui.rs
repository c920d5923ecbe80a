//! UI rendering

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use switchtrack::Phase;
use switchtrack_core::format;

use crate::app::App;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let summary_height = match (app.tracker.phase(), app.tracker.last_summary()) {
        (Phase::Stopped, Some(_)) => 6,
        _ => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),              // Header
            Constraint::Length(7),              // Timer
            Constraint::Length(summary_height), // Last summary
            Constraint::Min(0),                 // History
            Constraint::Length(1),              // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_timer(f, app, chunks[1]);
    if summary_height > 0 {
        draw_summary(f, app, chunks[2]);
    }
    draw_history(f, app, chunks[3]);
    draw_footer(f, app, chunks[4]);

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_header(f: &mut Frame, _app: &App, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Context Switch Tracker ", Style::default().fg(Color::Green).bold()),
        Span::raw(" - "),
        Span::styled(
            "Monitor your focus. Measure the cost of distraction.",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(header, area);
}

fn draw_timer(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = app.tracker.snapshot();
    let active = snapshot.phase.is_active();
    let border_color = if active { Color::Green } else { Color::Blue };

    let status = if !active {
        Span::styled("press space to start", Style::default().fg(Color::DarkGray))
    } else if app.tracker.is_away() {
        Span::styled("away", Style::default().fg(Color::Yellow).bold())
    } else {
        Span::styled("focused", Style::default().fg(Color::Green))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format::clock(snapshot.elapsed_ms),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(""),
        Line::from(vec![
            Span::raw("Context Switches: "),
            Span::styled(
                snapshot.switch_count.to_string(),
                Style::default().fg(Color::Magenta).bold(),
            ),
            Span::raw("  |  "),
            status,
        ])
        .centered(),
    ];

    if active && !app.focus_seen {
        lines.push(
            Line::from(Span::styled(
                "no focus events seen yet - switches count only if your terminal reports focus",
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
        );
    }

    let block = Block::default()
        .title(" Session Duration ")
        .title_style(Style::default().fg(border_color).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_summary(f: &mut Frame, app: &App, area: Rect) {
    let Some(summary) = app.tracker.last_summary() else {
        return;
    };

    let verdict_color = if summary.is_perfect() {
        Color::Green
    } else {
        Color::Yellow
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("  Total Time: ", Style::default().fg(Color::Cyan)),
            Span::raw(format::clock(summary.duration_ms)),
        ]),
        Line::from(vec![
            Span::styled("  Switches:   ", Style::default().fg(Color::Cyan)),
            Span::styled(summary.switches.to_string(), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(""),
        Line::from(Span::styled(summary.verdict(), Style::default().fg(verdict_color))).centered(),
    ];

    let block = Block::default()
        .title(" Session Summary ")
        .title_style(Style::default().fg(Color::Yellow).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let history = app.tracker.history();
    let now = Utc::now();

    let mut items: Vec<Line> = history
        .all()
        .take(app.history_display)
        .enumerate()
        .map(|(i, s)| {
            Line::from(vec![
                Span::styled(
                    format!(" #{:<3}", history.len() - i),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{}  ", format::clock(s.duration_ms))),
                Span::styled(
                    format!("{:>3} switches  ", s.switches),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(
                    format::relative_time(s.timestamp, now),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    if items.is_empty() {
        items.push(Line::from(Span::styled(
            " No sessions yet",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let stats = app.stats();
        let (hours, mins) = stats.total_time();
        items.push(Line::from(""));
        items.push(Line::from(vec![
            Span::styled(" Total: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "{} sessions, {}h {}m, {} switches ({:.1}/h), {} perfect",
                stats.total_sessions,
                hours,
                mins,
                stats.total_switches,
                stats.switches_per_hour,
                stats.perfect_sessions
            )),
        ]));
    }

    let block = Block::default()
        .title(" History ")
        .title_style(Style::default().fg(Color::Blue).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    f.render_widget(Paragraph::new(items).block(block), area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let action = if app.tracker.phase().is_active() {
        " stop  "
    } else {
        " start  "
    };

    let help = Line::from(vec![
        Span::styled(" Space", Style::default().fg(Color::Cyan).bold()),
        Span::raw(action),
        Span::styled("?", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" quit"),
    ]);

    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn draw_help_overlay(f: &mut Frame) {
    let area = f.area();

    let popup_width = 52;
    let popup_height = 11;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width.min(area.width), popup_height.min(area.height));

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Space/s/Enter ", Style::default().fg(Color::Cyan)),
            Span::raw("Start or stop a session"),
        ]),
        Line::from(vec![
            Span::styled("  ?             ", Style::default().fg(Color::Cyan)),
            Span::raw("Toggle this help"),
        ]),
        Line::from(vec![
            Span::styled("  q / Esc       ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit and print the report"),
        ]),
        Line::from(""),
        Line::from("  A switch counts when this terminal loses focus"),
        Line::from("  and later regains it during a session."),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? to close",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];

    let help_popup = Paragraph::new(help_text).block(
        Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(help_popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use switchtrack::{ManualClock, SessionTracker};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_elapsed_and_summary() {
        let clock = ManualClock::new();
        let mut app = App::new(SessionTracker::new(clock.clone()), 10);

        app.toggle_session();
        clock.set_ms(3_661_000);
        app.tracker.tick();
        assert!(render(&app).contains("01:01:01"));

        app.toggle_session();
        let screen = render(&app);
        assert!(screen.contains("Session Summary"));
        assert!(screen.contains("Perfect focus!"));
        assert!(screen.contains("1 sessions"));
    }

    #[test]
    fn test_renders_empty_history() {
        let app = App::new(SessionTracker::new(ManualClock::new()), 10);
        assert!(render(&app).contains("No sessions yet"));
    }
}
