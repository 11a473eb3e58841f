use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::pagination::LoadState;
use crate::views::common::{DIM, HEADLINE, LOADING, border_style};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Debug ")
        .borders(Borders::ALL)
        .border_style(border_style());

    let state = app.load_state();
    let state_color = if state == LoadState::Idle { HEADLINE } else { LOADING };
    let metrics = app.scroll_metrics();
    let state_text = match app.feed.in_flight() {
        Some(page) => format!("{} (page {page})", state.label()),
        None => state.label().to_string(),
    };
    let breakpoints = app.breakpoints();

    let lines = vec![
        row("State", state_text, state_color),
        row("Cursor", app.feed.cursor().to_string(), HEADLINE),
        row("Articles", app.articles().len().to_string(), HEADLINE),
        row(
            "Layout",
            format!(
                "{} ({}/{})",
                app.layout.label(),
                breakpoints.tablet,
                breakpoints.desktop
            ),
            HEADLINE,
        ),
        row(
            "Listeners",
            format!(
                "{} scroll, {} resize",
                app.viewport.scroll_listeners(),
                app.viewport.resize_listeners()
            ),
            HEADLINE,
        ),
        row(
            "Scroll",
            format!(
                "{}+{}/{} rows",
                metrics.scroll_offset, metrics.viewport_height, metrics.content_height
            ),
            HEADLINE,
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn row(label: &str, value: String, color: ratatui::style::Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(DIM)),
        Span::styled(value, Style::default().fg(color)),
    ])
}
