use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub const ACCENT: Color = Color::Cyan;
pub const DIM: Color = Color::DarkGray;
pub const HEADLINE: Color = Color::White;
pub const SNIPPET: Color = Color::Gray;
pub const LOADING: Color = Color::Yellow;
pub const ERROR: Color = Color::Red;
pub const SELECTION_BG: Color = Color::Rgb(40, 44, 52);

pub fn border_style() -> Style {
    Style::default().fg(DIM)
}

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Render a message in a bordered block.
pub fn render_message(frame: &mut Frame, title: &str, text: &str, style: Style, area: Rect) {
    let widget = Paragraph::new(text.to_string())
        .style(style)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(title.to_string()),
        );
    frame.render_widget(widget, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
