use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::views::common::{ACCENT, DIM, LOADING};

/// Builder for the one-line status bar under the article list.
///
/// Layout: `[Label] [Loading?] Position | User | Help Text`
pub struct StatusBar<'a> {
    label: &'a str,
    loading_text: Option<&'a str>,
    position: Option<(usize, usize)>,
    user: Option<&'a str>,
    help_text: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            label: "",
            loading_text: None,
            position: None,
            user: None,
            help_text: "",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: &'a str) -> Self {
        self.loading_text = Some(text);
        self
    }

    pub fn position(mut self, current: usize, total: usize) -> Self {
        self.position = Some((current, total));
        self
    }

    pub fn user(mut self, email: &'a str) -> Self {
        self.user = Some(email);
        self
    }

    pub fn help(mut self, text: &'a str) -> Self {
        self.help_text = text;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(DIM);
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.label),
                Style::default().bg(ACCENT).fg(Color::Black),
            ),
            Span::raw(" "),
        ];

        if let Some(loading) = self.loading_text {
            spans.push(Span::styled(loading.to_string(), Style::default().fg(LOADING)));
            spans.push(Span::raw(" | "));
        }

        if let Some((current, total)) = self.position {
            spans.push(Span::styled(format!("{current}/{total}"), dim));
            spans.push(Span::raw(" | "));
        }

        if let Some(user) = self.user {
            spans.push(Span::styled(user.to_string(), dim));
            spans.push(Span::raw(" | "));
        }

        spans.push(Span::styled(self.help_text.to_string(), dim));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}
