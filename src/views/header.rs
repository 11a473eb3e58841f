use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::time::format_header_date;
use crate::views::common::{DIM, title_style};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let date = format_header_date(app.clock.local_now());
    let date_width = date.len() as u16;

    let chunks = Layout::horizontal([Constraint::Min(0), Constraint::Length(date_width)]).split(area);

    let title = Line::from(vec![
        Span::styled(" Headlines ", title_style()),
        Span::styled(format!("\u{2022} {}", app.feed.query()), Style::default().fg(DIM)),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(date, Style::default().fg(DIM)))),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_NOW, TestAppBuilder};
    use crate::views::tests::render_to_string;

    #[test]
    fn header_shows_todays_date_and_query() {
        let app = TestAppBuilder::new().build();
        let output = render_to_string(80, 1, |frame| render(frame, &app, frame.area()));

        assert!(output.contains("Wednesday, November 15, 2023"));
        assert!(output.contains("davis/sacramento"));
    }

    #[test]
    fn header_date_follows_local_timezone() {
        let clock = crate::time::fixed_clock_at_offset(TEST_NOW + 3 * 3600, -8 * 3600);
        let app = TestAppBuilder::new().clock(clock).build();
        let output = render_to_string(80, 1, |frame| render(frame, &app, frame.area()));

        assert!(output.contains("Tuesday, November 14, 2023"));
    }
}
