//! Prayers screen rendering
//!
//! A filter bar, the filtered prayer list and, when expanded, the text of the
//! selected prayer in a side pane.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Content, InputMode};
use crate::data::Prayer;

/// Renders the prayers view into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let content = app.prayers_content();
    if matches!(content, Content::Loading) {
        super::render_loading(frame, area, "prayers");
        return;
    }

    let banner = super::offline_banner(&content);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if banner.is_some() { 1 } else { 0 }),
            Constraint::Length(1), // Filter bar
            Constraint::Min(1),    // List and text
        ])
        .split(area);

    if let Some(banner) = banner {
        frame.render_widget(Paragraph::new(banner), chunks[0]);
    }
    render_filter_bar(frame, app, chunks[1]);

    let prayers = app.visible_prayers();
    let selected = prayers.get(app.selected_index);

    match selected.filter(|_| app.expanded) {
        Some(prayer) => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[2]);
            render_list(frame, app, &prayers, panes[0]);
            render_text(frame, app, prayer, panes[1]);
        }
        None => render_list(frame, app, &prayers, chunks[2]),
    }
}

/// Renders search query, category and favorites-only state
fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.input_mode == InputMode::Search;
    let query_style = if searching {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if searching { "_" } else { "" };

    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}{}", app.filter.query, cursor), query_style),
        Span::raw("   "),
        Span::styled("Category: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.filter.category_label().to_string(),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if app.filter.favorites_only {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            "★ favorites only",
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the prayer list, scrolled so the selection stays visible
fn render_list(frame: &mut Frame, app: &App, prayers: &[Prayer], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Prayers ({}) ", prayers.len()));

    if prayers.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No prayers match the current filter",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = prayers
        .iter()
        .enumerate()
        .map(|(index, prayer)| {
            let is_selected = index == app.selected_index;
            let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space
            let star = if app.favorites.contains(&prayer.title) {
                "★ "
            } else {
                "  "
            };
            let name_style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(cursor, Style::default().fg(Color::Cyan)),
                Span::styled(star, Style::default().fg(Color::Yellow)),
                Span::styled(prayer.title.clone(), name_style),
                Span::styled(
                    format!("  {}", prayer.category),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let visible_rows = area.height.saturating_sub(2) as usize;
    let offset = (app.selected_index + 1).saturating_sub(visible_rows);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((offset as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Renders the full text of `prayer`
fn render_text(frame: &mut Frame, app: &App, prayer: &Prayer, area: Rect) {
    let mut title = format!(" {} ", prayer.title);
    if app.favorites.contains(&prayer.title) {
        title = format!(" ★{}", title);
    }

    let paragraph = Paragraph::new(prayer.text.clone())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::{failing_app, prayer, sample_app};
    use crate::ui::test_util::render_to_string;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(app: &mut crate::app::App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_offline_list_shows_bundled_prayers() {
        let app = failing_app(true);
        let content = render_to_string(&app);

        assert!(content.contains("Offline content"));
        assert!(content.contains("Our Father"));
        assert!(content.contains("Evening Prayer"));
        assert!(content.contains("Category: All"));
    }

    #[tokio::test]
    async fn test_error_shows_message_and_bundled_prayers() {
        let app = failing_app(false);
        app.prayers().load().await;

        let content = render_to_string(&app);

        assert!(content.contains("Gemini API key is not configured"));
        assert!(content.contains("showing offline content"));
        assert!(content.contains("Hail Mary"));
    }

    #[tokio::test]
    async fn test_expanded_prayer_shows_text() {
        let (mut app, _store) = sample_app(vec![
            prayer("Our Father", "Basic Prayers", "hallowed be thy name"),
            prayer("Anima Christi", "Eucharistic Prayers", "Soul of Christ, sanctify me"),
        ]);
        app.prayers().load().await;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        let content = render_to_string(&app);

        assert!(content.contains("Soul of Christ, sanctify me"));
        assert!(!content.contains("hallowed be thy name"));
    }

    #[tokio::test]
    async fn test_favorite_marker_and_empty_filter_message() {
        let (mut app, _store) =
            sample_app(vec![prayer("Angelus", "Marian Prayers", "The Angel of the Lord")]);
        app.prayers().load().await;

        press(&mut app, KeyCode::Char('f'));
        assert!(render_to_string(&app).contains("★ Angelus"));

        press(&mut app, KeyCode::Char('/'));
        for c in "zzz".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let content = render_to_string(&app);

        assert!(content.contains("No prayers match the current filter"));
        assert!(content.contains("Search: zzz_"));
    }
}
