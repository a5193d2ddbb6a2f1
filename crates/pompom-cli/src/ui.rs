//! UI rendering

use pompom_core::{Mode, Snapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const MENU_BG: Color = Color::Rgb(0xCC, 0x67, 0x66);

fn mode_color(mode: Mode) -> Color {
    match mode {
        Mode::Focus => Color::Green,
        Mode::ShortBreak => Color::Blue,
        Mode::LongBreak => Color::Magenta,
    }
}

/// Main draw function
pub fn draw(f: &mut Frame, snapshot: &Snapshot, show_help: bool) {
    // Menu bar, timer, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_menu(f, snapshot, chunks[0]);
    draw_timer(f, snapshot, chunks[1]);
    draw_status(f, snapshot, chunks[2]);

    if show_help {
        draw_help_overlay(f, snapshot);
    }
}

fn draw_menu(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let entries: Vec<String> = Mode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            format!(
                "{} - {} - {}m",
                i + 1,
                mode.label(),
                snapshot.durations.get(*mode)
            )
        })
        .collect();

    let menu = Paragraph::new(entries.join("    "))
        .alignment(Alignment::Center)
        .style(Style::default().bg(MENU_BG).fg(Color::White));
    f.render_widget(menu, area);
}

fn draw_timer(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let color = mode_color(snapshot.mode);
    let lines = vec![
        Line::from(Span::styled(
            snapshot.clock.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(snapshot.mode.label(), Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} focus sessions completed", snapshot.completed_focus),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    // Vertically center the block of lines.
    let height = lines.len() as u16;
    let top = area.height.saturating_sub(height) / 2;
    let inner = Rect::new(area.x, area.y + top, area.width, height.min(area.height));

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_status(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(90), Constraint::Percentage(10)])
        .split(area);

    let auto = if snapshot.auto_switch { "" } else { " [auto-switch off]" };
    let status = Paragraph::new(format!(" PomPom - {}{}", snapshot.status, auto)).fg(Color::White);
    let help = Paragraph::new("Help - ? ")
        .alignment(Alignment::Right)
        .fg(Color::White);

    f.render_widget(status, cols[0]);
    f.render_widget(help, cols[1]);
}

fn draw_help_overlay(f: &mut Frame, snapshot: &Snapshot) {
    let area = centered_rect(80, 75, f.area());

    // Clear the area behind the popup
    f.render_widget(Clear, area);

    let key = |k: &'static str| Span::styled(format!(" {k:<8}"), Style::default().bold());
    let d = &snapshot.durations;
    let help_text = vec![
        Line::from(Span::styled(
            "PomPom - Keyboard Shortcuts",
            Style::default().bold(),
        ))
        .centered(),
        Line::from(""),
        Line::from(vec![key("[Space]"), Span::raw(": Start/Pause timer")]),
        Line::from(vec![key("[r]"), Span::raw(": Reset current timer")]),
        Line::from(vec![key("[d]"), Span::raw(": Reset to default duration")]),
        Line::from(vec![
            key("[1]"),
            Span::raw(format!(": Switch to FOCUS mode - {}m", d.focus)),
        ]),
        Line::from(vec![
            key("[2]"),
            Span::raw(format!(": Switch to SHORT BREAK mode - {}m", d.short_break)),
        ]),
        Line::from(vec![
            key("[3]"),
            Span::raw(format!(": Switch to LONG BREAK mode - {}m", d.long_break)),
        ]),
        Line::from(vec![key("[+/-]"), Span::raw(": Increase/decrease current duration")]),
        Line::from(vec![
            key("[a]"),
            Span::raw(format!(
                ": Toggle auto-switch (currently {})",
                if snapshot.auto_switch { "ON" } else { "OFF" }
            )),
        ]),
        Line::from(vec![key("[c]"), Span::raw(": Clear statistics")]),
        Line::from(vec![key("[?]"), Span::raw(": Show this help")]),
        Line::from(vec![key("[q]"), Span::raw(": Quit PomPom")]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close this help",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];

    let popup = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    f.render_widget(popup, area);
}

/// Rect of `percent_x` by `percent_y` centered in `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pompom_core::{DurationConfig, TimerState};
    use ratatui::{backend::TestBackend, Terminal};

    fn snapshot() -> Snapshot {
        Snapshot {
            mode: Mode::ShortBreak,
            state: TimerState::Running,
            running: true,
            remaining_secs: 299,
            clock: "04:59".into(),
            completed_focus: 2,
            auto_switch: true,
            durations: DurationConfig::default(),
            status: "SHORT BREAK - Running".into(),
        }
    }

    fn render(snapshot: &Snapshot, show_help: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, snapshot, show_help)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_menu_clock_and_status() {
        let screen = render(&snapshot(), false);
        assert!(screen.contains("1 - FOCUS - 25m"));
        assert!(screen.contains("2 - SHORT BREAK - 5m"));
        assert!(screen.contains("3 - LONG BREAK - 15m"));
        assert!(screen.contains("04:59"));
        assert!(screen.contains("2 focus sessions completed"));
        assert!(screen.contains("PomPom - SHORT BREAK - Running"));
        assert!(!screen.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn renders_help_overlay() {
        let mut snap = snapshot();
        snap.auto_switch = false;
        let screen = render(&snap, true);
        assert!(screen.contains("Keyboard Shortcuts"));
        assert!(screen.contains("currently OFF"));
    }
}
