//! Saints screen rendering
//!
//! The saint of the day on top, then the bundled calendar: a month (or a
//! search across all months) on the left and the selected saint's details
//! on the right.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Content, InputMode};
use crate::data::{month_name, Saint};

/// Renders the saints view into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Saint of the day
            Constraint::Length(1), // Month or search
            Constraint::Min(3),    // Calendar
        ])
        .split(area);

    render_saint_of_day(frame, app, chunks[0]);
    render_header(frame, app, chunks[1]);

    let saints = app.visible_saints();
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    render_list(frame, app, &saints, panes[0]);
    render_details(frame, saints.get(app.saints_selected).copied(), panes[1]);
}

fn render_saint_of_day(frame: &mut Frame, app: &App, area: Rect) {
    let content = app.saint_of_day_content();
    let mut lines = Vec::new();
    if let Some(banner) = super::offline_banner(&content) {
        lines.push(banner);
    }
    match content.value() {
        Some(saint) => {
            lines.push(Line::from(Span::styled(
                saint.name.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(saint.description.clone()));
        }
        None if matches!(content, Content::Loading) => {
            lines.push(Line::from(Span::styled(
                "Loading saint of the day...",
                Style::default().fg(Color::Cyan),
            )));
        }
        None => {}
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Saint of the Day, {} ", app.today().format("%B %-d"))),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Search bar while searching, otherwise the browsed month
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.input_mode == InputMode::Search;
    let line = if searching || !app.saints_query.trim().is_empty() {
        let cursor = if searching { "_" } else { "" };
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}{}", app.saints_query, cursor),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("  (all months)", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("◂ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                month_name(app.saints_month),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▸", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(frame: &mut Frame, app: &App, saints: &[&Saint], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Calendar ");

    if saints.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No saints match the search",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = saints
        .iter()
        .enumerate()
        .map(|(i, saint)| {
            let selected = i == app.saints_selected;
            let marker = if selected { "▸ " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{:>2} ", saint.day), Style::default().fg(Color::Gray)),
                Span::styled(saint.name, style),
            ])
        })
        .collect();

    // Keep the selection on screen
    let visible = area.height.saturating_sub(2) as usize;
    let offset = app.saints_selected.saturating_sub(visible.saturating_sub(1));
    let scroll = u16::try_from(offset).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn render_details(frame: &mut Frame, saint: Option<&Saint>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let Some(saint) = saint else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            saint.name,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Feast: {}", saint.feast_label()),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(saint.description),
    ];
    if !saint.patronage.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Patron of: ", Style::default().fg(Color::Gray)),
            Span::raw(saint.patronage.join(", ")),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::{test_support::failing_app, App, View};
    use crate::ui::test_util::render_to_string;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn saints_app(offline: bool) -> App {
        let mut app = failing_app(offline);
        app.view = View::Saints;
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_offline_saint_of_day_and_month_list() {
        let app = saints_app(true);
        let content = render_to_string(&app);

        assert!(content.contains("Saint of the Day, October 18"));
        assert!(content.contains("St. Luke, Evangelist"));
        assert!(content.contains("Offline content"));
        assert!(content.contains("◂ October ▸"));
        assert!(content.contains("▸  1 St. Thérèse of the Child Jesus"));
        assert!(content.contains("Feast: October 1"));
    }

    #[tokio::test]
    async fn test_saint_of_day_error_shows_message() {
        let app = saints_app(false);
        assert!(render_to_string(&app).contains("Loading saint of the day..."));

        app.saint_of_day().load().await;
        let content = render_to_string(&app);

        assert!(content.contains("provider down"));
        assert!(content.contains("St. Luke, Evangelist"));
    }

    #[test]
    fn test_details_follow_selection() {
        let mut app = saints_app(true);
        press(&mut app, KeyCode::Down);

        let content = render_to_string(&app);

        assert!(content.contains("▸  4 St. Francis of Assisi"));
        assert!(content.contains("Feast: October 4"));
        assert!(content.contains("Patron of: animals, ecology, Italy"));
    }

    #[test]
    fn test_search_header_and_empty_result() {
        let mut app = saints_app(true);
        press(&mut app, KeyCode::Char('/'));
        for c in "zzz".chars() {
            press(&mut app, KeyCode::Char(c));
        }

        let content = render_to_string(&app);

        assert!(content.contains("Search: zzz_"));
        assert!(content.contains("(all months)"));
        assert!(content.contains("No saints match the search"));
    }
}
