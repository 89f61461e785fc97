//! Daily readings screen rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Content};
use crate::data::{DailyReadings, Prayer, Reading};

/// Renders the readings view into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let content = app.readings_content();
    let Some(readings) = content.value() else {
        super::render_loading(frame, area, "today's readings");
        return;
    };

    let mut lines = Vec::new();
    if let Some(banner) = super::offline_banner(&content) {
        lines.push(banner);
        lines.push(Line::from(""));
    }
    lines.extend(prayer_of_day_lines(&app.prayer_of_day_content()));
    let explanation = app.explanation_content();
    lines.extend(readings_lines(
        readings,
        app.selected_reading,
        explanation.as_ref(),
    ));

    // Clamp so `G` lands on the last line instead of an empty screen.
    // Row count is estimated from character width, not word wrapping.
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let total_rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(inner_width))
        .sum();
    let visible_rows = area.height.saturating_sub(2) as usize;
    let max_scroll = u16::try_from(total_rows.saturating_sub(visible_rows)).unwrap_or(u16::MAX);
    let scroll = app.readings_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", readings.date)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// The prayer of the day, ahead of the readings
fn prayer_of_day_lines(content: &Content<Prayer>) -> Vec<Line<'static>> {
    let heading = Span::styled(
        "Prayer of the Day",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    );
    let mut lines = Vec::new();
    match content.value() {
        Some(prayer) => {
            lines.push(Line::from(vec![
                heading,
                Span::styled(
                    format!("  {}", prayer.title),
                    Style::default().fg(Color::Yellow),
                ),
            ]));
            lines.push(Line::from(prayer.text.clone()));
        }
        None => {
            lines.push(Line::from(heading));
            lines.push(Line::from(Span::styled(
                "Loading prayer of the day...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::from(""));
    lines
}

/// Builds the feast heading followed by each reading
///
/// The reading at `selected` is marked, and followed by `explanation` when
/// one is shown.
fn readings_lines(
    readings: &DailyReadings,
    selected: usize,
    explanation: Option<&Content<String>>,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            readings.feast.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (index, (heading, reading)) in readings.sections().into_iter().enumerate() {
        let is_selected = index == selected;
        lines.extend(section_lines(heading, reading, is_selected));
        if let Some(explanation) = explanation.filter(|_| is_selected) {
            lines.extend(explanation_lines(explanation));
        }
    }
    lines
}

fn section_lines(heading: &str, reading: &Reading, selected: bool) -> Vec<Line<'static>> {
    let marker = if selected { "▸ " } else { "  " };
    vec![
        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(
                heading.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", reading.citation),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(reading.text.clone()),
        Line::from(""),
    ]
}

fn explanation_lines(content: &Content<String>) -> Vec<Line<'static>> {
    let style = Style::default().fg(Color::Green);
    let mut lines = vec![Line::from(Span::styled(
        "Explanation",
        style.add_modifier(Modifier::BOLD),
    ))];
    if let Some(banner) = super::offline_banner(content) {
        lines.push(banner);
    }
    match content.value() {
        Some(text) => lines.push(Line::from(Span::styled(text.clone(), style))),
        None => lines.push(Line::from(Span::styled(
            "Loading explanation...",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    lines.push(Line::from(""));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::failing_app;
    use crate::ui::test_util::render_to_string;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn reading(citation: &str) -> Reading {
        Reading {
            citation: citation.to_string(),
            text: format!("Text of {}", citation),
        }
    }

    /// Text of `line` without the selection marker
    fn line_text(line: &Line) -> String {
        let text: String = line.spans.iter().map(|span| span.content.to_string()).collect();
        text.trim_start_matches(&['▸', ' '][..]).to_string()
    }

    #[test]
    fn test_second_reading_only_when_present() {
        let mut readings = DailyReadings {
            date: "October 18, 2026".to_string(),
            feast: "Twenty-ninth Sunday in Ordinary Time".to_string(),
            first_reading: reading("Isaiah 53:10-11"),
            responsorial_psalm: reading("Psalm 33"),
            second_reading: None,
            gospel: reading("Mark 10:35-45"),
        };

        let without: Vec<String> = readings_lines(&readings, 0, None)
            .iter()
            .map(line_text)
            .collect();
        assert!(!without.iter().any(|l| l.starts_with("Second Reading")));

        readings.second_reading = Some(reading("Hebrews 4:14-16"));
        let with: Vec<String> = readings_lines(&readings, 0, None)
            .iter()
            .map(line_text)
            .collect();
        let headings: Vec<&String> = with
            .iter()
            .filter(|l| {
                ["First Reading", "Responsorial Psalm", "Second Reading", "Gospel"]
                    .iter()
                    .any(|h| l.starts_with(h))
            })
            .collect();

        assert_eq!(headings.len(), 4);
        assert!(headings[2].contains("Hebrews 4:14-16"));
        assert!(headings[3].starts_with("Gospel"));
    }

    #[test]
    fn test_offline_readings_render() {
        let mut app = failing_app(true);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));

        let content = render_to_string(&app);

        assert!(content.contains("October 18, 2026"));
        assert!(content.contains("Readings unavailable offline"));
        assert!(content.contains("Mark 6:34-44"));
        assert!(content.contains("Offline content"));
    }

    #[test]
    fn test_loading_readings_render() {
        let mut app = failing_app(false);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));

        assert!(render_to_string(&app).contains("Loading today's readings..."));
    }

    #[test]
    fn test_scroll_to_bottom_keeps_content_visible() {
        let mut app = failing_app(true);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::NONE));

        assert!(render_to_string(&app).contains("Mark 6:34-44"));
    }

    #[test]
    fn test_prayer_of_day_and_selected_marker() {
        let mut app = failing_app(true);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));

        let content = render_to_string(&app);
        assert!(content.contains("Prayer of the Day  Prayer for Today"));
        assert!(content.contains("▸ First Reading  1 John 4:7-10"));

        app.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE));
        let content = render_to_string(&app);
        assert!(content.contains("▸ Gospel  Mark 6:34-44"));
        assert!(content.contains("  First Reading"));
    }

    #[test]
    fn test_explanation_shown_under_selected_reading() {
        let mut app = failing_app(true);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));

        let content = render_to_string(&app);

        assert!(content.contains("Explanation"));
        assert!(content.contains("This reading from Psalm 72:1-2, 3-4, 7-8 invites us"));
    }

    #[test]
    fn test_explanation_lines_while_loading() {
        let lines: Vec<String> = explanation_lines(&Content::Loading)
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(lines, vec!["Explanation", "Loading explanation...", ""]);
    }
}
