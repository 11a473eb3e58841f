use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::api::Comment;
use crate::app::{App, Session};
use crate::views::common::{
    ACCENT, DIM, ERROR, HEADLINE, LOADING, border_style, render_message, title_style,
};

pub const SIGN_IN_PROMPT: &str = "Sign in to read and post comments. Restart with --session <cookie>.";
pub const NOT_AVAILABLE: &str = "Comments are not available for this article";

/// Render the comments panel for the article it was opened on.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let article = app.comments.article_index.and_then(|i| app.articles().get(i));

    match &app.session {
        Session::Unknown => {
            render_message(frame, "Comments", "Checking sign-in...", Style::default().fg(LOADING), area);
            return;
        }
        Session::Anonymous => {
            render_message(frame, "Comments", SIGN_IN_PROMPT, Style::default().fg(DIM), area);
            return;
        }
        Session::SignedIn(_) => {}
    }

    if article.is_none_or(|a| a.id.is_none()) {
        render_message(frame, "Comments", NOT_AVAILABLE, Style::default().fg(DIM), area);
        return;
    }

    if app.comments.loading {
        render_message(frame, "Comments", "Loading comments...", Style::default().fg(LOADING), area);
        return;
    }

    if let Some(err) = &app.comments.error {
        render_message(frame, "Error", err, Style::default().fg(ERROR), area);
        return;
    }

    if app.comments.comments.is_empty() {
        render_message(frame, "Comments", "No comments yet", Style::default().fg(DIM), area);
        return;
    }

    // 2 for borders, 2 for padding
    let content_width = area.width.saturating_sub(4) as usize;

    let mut lines = Vec::new();
    if let Some(article) = article {
        for row in wrap_text(&article.headline_text(), content_width) {
            lines.push(Line::from(Span::styled(row, title_style())));
        }
        lines.push(Line::from(""));
    }
    for comment in &app.comments.comments {
        lines.extend(comment_lines(comment, content_width));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(format!("Comments ({})", app.comments.comments.len())),
    );
    frame.render_widget(widget, area);
}

fn comment_lines(comment: &Comment, max_width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        comment.user.clone(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))];

    let text = html_escape::decode_html_entities(&comment.text);
    let available_width = max_width.saturating_sub(2).max(20);
    for row in wrap_text(&text, available_width) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(row, Style::default().fg(HEADLINE)),
        ]));
    }

    lines.push(Line::from(""));
    lines
}

/// Wrap text to the given width, preserving words.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ItemId, User};
    use crate::app::Message;
    use crate::test_utils::{ArticleBuilder, TestAppBuilder};
    use crate::views::tests::render_to_string;

    fn signed_in() -> Session {
        Session::SignedIn(User {
            email: "reader@example.com".into(),
        })
    }

    fn comment(id: u64, user: &str, text: &str) -> Comment {
        Comment {
            id: ItemId::Number(id),
            text: text.into(),
            user: user.into(),
        }
    }

    #[test]
    fn anonymous_user_sees_sign_in_prompt() {
        let mut app = TestAppBuilder::new()
            .with_articles(vec![ArticleBuilder::new().id(1).build()])
            .session(Session::Anonymous)
            .build();
        app.update(Message::ToggleComments);

        let output = render_to_string(80, 10, |frame| render(frame, &app, frame.area()));

        assert!(output.contains("Sign in to read and post comments."));
    }

    #[test]
    fn article_without_id_has_no_comments() {
        let mut app = TestAppBuilder::new()
            .with_articles(vec![ArticleBuilder::new().build()])
            .session(signed_in())
            .build();
        app.update(Message::ToggleComments);

        let output = render_to_string(80, 10, |frame| render(frame, &app, frame.area()));

        assert!(output.contains(NOT_AVAILABLE));
    }

    #[test]
    fn shows_loading_then_comments() {
        let mut app = TestAppBuilder::new()
            .with_articles(vec![ArticleBuilder::new().id(7).headline("Transit Plan").build()])
            .session(signed_in())
            .build();
        app.comments.article_index = Some(0);
        app.comments.loading = true;

        let output = render_to_string(60, 12, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("Loading comments..."));

        app.comments.loading = false;
        app.comments.comments = vec![
            comment(1, "ann@example.com", "Long overdue &amp; welcome."),
            comment(2, "bo@example.com", "Who pays for it?"),
        ];

        let output = render_to_string(60, 12, |frame| render(frame, &app, frame.area()));
        assert!(output.contains("Comments (2)"));
        assert!(output.contains("Transit Plan"));
        assert!(output.contains("ann@example.com"));
        assert!(output.contains("Long overdue & welcome."));
        assert!(output.contains("Who pays for it?"));
    }

    #[test]
    fn shows_error() {
        let mut app = TestAppBuilder::new()
            .with_articles(vec![ArticleBuilder::new().id(7).build()])
            .session(signed_in())
            .build();
        app.comments.article_index = Some(0);
        app.comments.error = Some("Server error. Please try again later.".into());

        let output = render_to_string(60, 8, |frame| render(frame, &app, frame.area()));

        assert!(output.contains("Server error."));
    }

    #[test]
    fn wrap_text_preserves_words() {
        let wrapped = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(wrapped, vec!["the quick", "brown fox", "jumps"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
