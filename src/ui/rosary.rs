//! Rosary screen rendering
//!
//! The mysteries of the walk, the current bead and its prayer, and a
//! progress line with running counts.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::rosary::{RosaryWalk, Step, TOTAL_STEPS};

/// Renders the rosary view into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let walk = &app.rosary;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Mystery
            Constraint::Min(3),    // Bead
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Counts
        ])
        .split(area);

    frame.render_widget(mystery_panel(walk), chunks[0]);

    let step = walk.current();
    let bead = Paragraph::new(vec![
        Line::from(Span::styled(
            bead_heading(&step),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(step.bead.text()),
    ])
    .block(Block::default().borders(Borders::ALL))
    .wrap(Wrap { trim: true });
    frame.render_widget(bead, chunks[1]);

    let ratio = (walk.position() + 1) as f64 / TOTAL_STEPS as f64;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio.min(1.0))
        .label(format!("Bead {} of {}", walk.position() + 1, TOTAL_STEPS));
    frame.render_widget(gauge, chunks[2]);

    frame.render_widget(Paragraph::new(counts_line(walk)), chunks[3]);
}

/// The set name, and the current mystery once inside a decade
fn mystery_panel(walk: &RosaryWalk) -> Paragraph<'static> {
    let lines = match (walk.mystery(), walk.current().decade) {
        (Some(mystery), Some(decade)) => vec![
            Line::from(Span::styled(
                format!("{} Mystery: {}", ordinal(decade), mystery.title),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                mystery.scripture,
                Style::default().fg(Color::Yellow),
            )),
            Line::from(format!("Fruit: {}", mystery.fruit)),
            Line::from(Span::styled(
                mystery.reflection,
                Style::default().fg(Color::Gray),
            )),
        ],
        _ if walk.position() >= TOTAL_STEPS - 2 => vec![Line::from(Span::styled(
            "Closing prayers",
            Style::default().fg(Color::Cyan),
        ))],
        _ => vec![Line::from(Span::styled(
            "Opening prayers",
            Style::default().fg(Color::Cyan),
        ))],
    };

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", walk.set.name())),
        )
        .wrap(Wrap { trim: true })
}

fn bead_heading(step: &Step) -> String {
    match step.hail_mary {
        Some(n) => format!("{} ({})", step.bead.name(), n),
        None => step.bead.name().to_string(),
    }
}

fn counts_line(walk: &RosaryWalk) -> Line<'static> {
    let count = walk.counts();
    let mut spans = vec![Span::styled(
        format!(
            "Our Father {}  Hail Mary {}  Glory Be {}",
            count.our_father, count.hail_mary, count.glory_be
        ),
        Style::default().fg(Color::DarkGray),
    )];
    if walk.is_finished() {
        spans.push(Span::styled(
            "  Rosary complete",
            Style::default().fg(Color::Green),
        ));
    }
    Line::from(spans)
}

fn ordinal(decade: usize) -> &'static str {
    match decade {
        0 => "First",
        1 => "Second",
        2 => "Third",
        3 => "Fourth",
        _ => "Fifth",
    }
}
