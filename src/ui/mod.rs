//! UI rendering module for the missal CLI
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod prayers;
pub mod readings;
pub mod rosary;
pub mod saints;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Content, View};

pub use help_overlay::render as render_help_overlay;
pub use prayers::render as render_prayers;
pub use readings::render as render_readings;
pub use rosary::render as render_rosary;
pub use saints::render as render_saints;

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tabs
            Constraint::Min(3),    // View
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match app.view {
        View::Prayers => render_prayers(frame, app, chunks[1]),
        View::Readings => render_readings(frame, app, chunks[1]),
        View::Rosary => render_rosary(frame, app, chunks[1]),
        View::Saints => render_saints(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);

    if app.show_help {
        render_help_overlay(frame, app.view);
    }
}

/// Renders the title and the view tabs
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "MISSAL",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    for view in View::ALL {
        let style = if view == app.view {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
        spans.push(Span::raw(" "));
    }

    if app.is_offline() {
        spans.push(Span::styled("[offline]", Style::default().fg(Color::Yellow)));
    }

    let separator = "─".repeat(area.width as usize);
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders the status message, or key hints when there is none
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => {
            let hints = match app.view {
                View::Prayers => {
                    "/ search  c category  f favorite  F favorites  Enter expand  Tab view  ? help"
                }
                View::Readings => {
                    "↑/↓ scroll  n/p reading  e explain  r refresh  Tab view  ? help"
                }
                View::Rosary => "Space next  h back  n/p decade  m mysteries  t today  ? help",
                View::Saints => "↑/↓ select  ←/→ month  t this month  / search  ? help",
            };
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders a centered loading message
pub(crate) fn render_loading(frame: &mut Frame, area: Rect, what: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new(format!("Loading {}...", what))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Banner line shown above bundled content
pub(crate) fn offline_banner<T>(content: &Content<T>) -> Option<Line<'static>> {
    if !content.is_offline() {
        return None;
    }
    let text = match content.error() {
        Some(error) => format!("⚠ {} (showing offline content)", error),
        None => "Offline content".to_string(),
    };
    Some(Line::from(Span::styled(
        text,
        Style::default().fg(Color::Yellow),
    )))
}

#[cfg(test)]
pub(crate) mod test_util {
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::App;

    /// Renders `app` into a 100x30 buffer and returns its rows
    pub fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
