use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::Article;
use crate::app::App;
use crate::help::{articles_help, comments_help, format_items};
use crate::keys::list_keymap;
use crate::pagination::LoadState;
use crate::time::{format_relative, parse_published};
use crate::views::common::{
    ACCENT, DIM, HEADLINE, LOADING, SELECTION_BG, SNIPPET, border_style, render_message,
};
use crate::views::status_bar::StatusBar;
use crate::views::{comments, header};

pub const LOADING_INITIAL: &str = "Loading articles...";
pub const LOADING_MORE: &str = "Loading more articles...";

const MARKER: &str = "\u{25b6} ";
const IMAGE_MARKER: &str = "[image]";
const INDENT: &str = "  ";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(0),    // Articles and comments
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    header::render(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    if !app.comments.is_open() {
        render_article_list(frame, app, area);
        return;
    }
    if app.layout.side_panel() {
        let chunks =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(area);
        render_article_list(frame, app, chunks[0]);
        comments::render(frame, app, chunks[1]);
    } else {
        comments::render(frame, app, area);
    }
}

fn render_article_list(frame: &mut Frame, app: &App, area: Rect) {
    let articles = app.articles();

    if articles.is_empty() {
        match app.load_state() {
            LoadState::Idle => render_message(
                frame,
                "Articles",
                "No articles found",
                Style::default().fg(DIM),
                area,
            ),
            _ => render_message(
                frame,
                "Articles",
                LOADING_INITIAL,
                Style::default().fg(LOADING),
                area,
            ),
        }
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(format!("Articles ({})", articles.len()));
    let inner = block.inner(area);
    let width = inner.width as usize;
    let rows = inner.height as usize;

    let mut lines = Vec::with_capacity(rows);
    for (i, article) in articles.iter().enumerate().skip(app.scroll_offset) {
        let item = article_lines(article, app, i == app.selected_index, width);
        if lines.len() + item.len() > rows {
            break;
        }
        lines.extend(item);
    }
    if app.load_state() == LoadState::LoadingMore && lines.len() < rows {
        lines.push(Line::from(Span::styled(
            format!("{INDENT}{LOADING_MORE}"),
            Style::default().fg(LOADING),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn article_lines(article: &Article, app: &App, selected: bool, width: usize) -> Vec<Line<'static>> {
    let text_width = width.saturating_sub(INDENT.len());
    let prefix = if selected { MARKER } else { INDENT };
    let mut headline_style = Style::default().fg(HEADLINE).add_modifier(Modifier::BOLD);
    if selected {
        headline_style = headline_style.bg(SELECTION_BG);
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(prefix, Style::default().fg(ACCENT)),
        Span::styled(truncate(&article.headline_text(), text_width), headline_style),
    ])];

    if app.layout.shows_snippet() {
        lines.push(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(
                truncate(&article.snippet_text(), text_width),
                Style::default().fg(SNIPPET),
            ),
        ]));
    }

    let mut meta_spans = vec![
        Span::raw(INDENT),
        Span::styled(truncate(&meta(article, app), text_width), Style::default().fg(DIM)),
    ];
    if app.layout.shows_image() && article.image_url().is_some() {
        let used = meta_spans[1].content.width();
        let marker = format!(" {IMAGE_MARKER}");
        if used + marker.width() <= text_width {
            meta_spans.push(Span::styled(marker, Style::default().fg(ACCENT)));
        }
    }
    lines.push(Line::from(meta_spans));

    lines
}

/// Source, age and comment count, skipping what the article lacks.
fn meta(article: &Article, app: &App) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(domain) = article.domain() {
        parts.push(domain.to_string());
    }
    if let Some(published) = article.published_date.as_deref().and_then(parse_published) {
        parts.push(format_relative(published, app.clock.now()));
    }
    parts.push(match article.comment_count {
        1 => "1 comment".to_string(),
        n => format!("{n} comments"),
    });
    parts.join(" \u{b7} ")
}

fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if width > 0 {
        out.push('\u{2026}');
    }
    out
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let items = if app.comments.is_open() {
        comments_help()
    } else {
        articles_help()
    };
    let help_text = format_items(&items, &list_keymap());

    let mut bar = StatusBar::new().label(app.layout.label()).help(&help_text);
    match app.load_state() {
        LoadState::LoadingInitial => bar = bar.loading(LOADING_INITIAL),
        LoadState::LoadingMore => bar = bar.loading(LOADING_MORE),
        LoadState::Idle => {}
    }
    if !app.articles().is_empty() {
        bar = bar.position(app.selected_index + 1, app.articles().len());
    }
    if let Some(user) = app.session.user() {
        bar = bar.user(&user.email);
    }
    bar.render(frame, area);
}
