//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::View;

/// Renders the help overlay on top of the current view
///
/// Shows the general keys and those of `view`.
pub fn render(frame: &mut Frame, view: View) {
    let area = frame.area();

    let mut lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("General"),
        help_line("Tab", "Next view"),
        help_line("Shift+Tab", "Previous view"),
        help_line("r", "Refresh current view"),
        help_line("?", "Toggle this help"),
        help_line("q", "Quit application"),
        Line::from(""),
        section(view.title()),
    ];
    lines.extend(
        view_keys(view)
            .iter()
            .map(|(key, description)| help_line(key, description)),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let overlay_area = centered_rect(54, height, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

/// Key bindings specific to `view`
fn view_keys(view: View) -> &'static [(&'static str, &'static str)] {
    match view {
        View::Prayers => &[
            ("↑/k, ↓/j", "Move selection up/down"),
            ("Enter", "Show / hide prayer text"),
            ("Esc", "Hide prayer text / Quit"),
            ("/", "Search (Enter keeps, Esc clears)"),
            ("c", "Next category"),
            ("f", "Toggle favorite"),
            ("F", "Show favorites only"),
        ],
        View::Readings => &[
            ("↑/k, ↓/j", "Scroll"),
            ("g, G", "Top / bottom"),
            ("n, p", "Next / previous reading"),
            ("e", "Explain selected reading"),
        ],
        View::Rosary => &[
            ("Space/l/→", "Next bead"),
            ("h/←", "Previous bead"),
            ("n, p", "Next / previous decade"),
            ("m", "Other mysteries"),
            ("t", "Today's mysteries"),
        ],
        View::Saints => &[
            ("↑/k, ↓/j", "Move selection up/down"),
            ("←/h, →/l", "Previous / next month"),
            ("t", "This month"),
            ("/", "Search all months"),
        ],
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_help_overlay_renders() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                render(frame, View::Prayers);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains("Help"), "Should render help title");
        assert!(content.contains("Prayers"), "Should show prayers section");
        assert!(content.contains("Toggle favorite"));
        assert!(!content.contains("Next bead"));
    }

    #[test]
    fn test_help_overlay_lists_current_view_keys() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, View::Rosary)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains("Shift+Tab"));
        assert!(content.contains("Next bead"));
        assert!(content.contains("Today's mysteries"));
        assert!(!content.contains("Toggle favorite"));
    }

    #[test]
    fn test_centered_rect_fits_small_terminal() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(54, 26, area);

        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }
}
