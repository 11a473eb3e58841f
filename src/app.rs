use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Article, ArticleSource, Comment, ItemId, NewsClient, User};
use crate::feed::{FeedController, Settled};
use crate::layout::{Breakpoints, LayoutClass, LayoutWatcher};
use crate::pagination::LoadState;
use crate::scroll::ScrollTrigger;
use crate::time::Clock;
use crate::viewport::{ScrollMetrics, Viewport};

/// Results from background tasks other than article pages.
pub enum AsyncResult {
    User(Option<User>),
    Comments {
        article_id: ItemId,
        result: Result<Vec<Comment>, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Unknown,
    Anonymous,
    SignedIn(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

/// Comments for one article. Only populated for signed-in users.
#[derive(Debug, Default)]
pub struct CommentsPanel {
    pub article_index: Option<usize>,
    pub comments: Vec<Comment>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CommentsPanel {
    pub fn is_open(&self) -> bool {
        self.article_index.is_some()
    }

    fn close(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,
    OpenUrl,
    ToggleComments,
    Back,
    Quit,
    ToggleHelp,
    ToggleDebug,
    LoadMore,
    /// Terminal resized: width in pixels, height in rows.
    Resize {
        width: u32,
        height: u16,
    },
    LayoutChanged(LayoutClass),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub query: String,
    pub scroll_threshold: usize,
    pub breakpoints: Breakpoints,
}

pub struct App {
    pub feed: FeedController,
    pub viewport: Viewport,
    scroll_trigger: ScrollTrigger,
    layout_watcher: LayoutWatcher,
    pub layout: LayoutClass,
    pub selected_index: usize,
    /// Index of the first article shown in the list.
    pub scroll_offset: usize,
    /// Terminal height in rows.
    pub viewport_height: Option<u16>,
    pub session: Session,
    pub comments: CommentsPanel,
    pub client: NewsClient,
    pub clock: Arc<dyn Clock>,
    pub show_help: bool,
    pub show_debug: bool,
    pub should_quit: bool,
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

impl App {
    /// Header, status bar and the list's two borders.
    const LAYOUT_OVERHEAD: u16 = 4;
    const PAGE_STEP: usize = 10;
    pub const DEBUG_PANE_HEIGHT: u16 = 8;

    pub fn new(
        config: AppConfig,
        client: NewsClient,
        source: Arc<dyn ArticleSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::channel(10);
        Self {
            feed: FeedController::new(source, config.query),
            viewport: Viewport::new(),
            scroll_trigger: ScrollTrigger::new(config.scroll_threshold),
            layout_watcher: LayoutWatcher::new(config.breakpoints),
            layout: LayoutClass::default(),
            selected_index: 0,
            scroll_offset: 0,
            viewport_height: None,
            session: Session::Unknown,
            comments: CommentsPanel::default(),
            client,
            clock,
            show_help: false,
            show_debug: false,
            should_quit: false,
            result_tx,
            result_rx,
        }
    }

    pub fn articles(&self) -> &[Article] {
        self.feed.articles()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles().get(self.selected_index)
    }

    pub fn load_state(&self) -> LoadState {
        self.feed.state()
    }

    pub fn breakpoints(&self) -> Breakpoints {
        self.layout_watcher.breakpoints()
    }

    /// Attach the resize listener and begin the initial page load.
    /// The scroll listener waits until page 0 has settled.
    pub fn mount(&mut self) {
        self.layout_watcher.attach(&mut self.viewport);
        self.feed.start();
    }

    /// Detach every viewport listener and abandon in-flight work.
    pub fn teardown(&mut self) {
        self.scroll_trigger.detach(&mut self.viewport);
        self.layout_watcher.detach(&mut self.viewport);
        self.feed.teardown();
    }

    /// Drain finished background work without blocking.
    pub fn poll_results(&mut self) {
        for settled in self.feed.poll() {
            self.on_page_settled(settled);
        }
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_async_result(result);
        }
    }

    fn on_page_settled(&mut self, settled: Settled) {
        if settled.initial {
            self.scroll_trigger.attach(&mut self.viewport);
        }
        if settled.count == 0 {
            debug!(page = settled.page, "page came back empty");
        }
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::User(user) => {
                self.session = match user {
                    Some(user) => {
                        info!(email = %user.email, "signed in");
                        Session::SignedIn(user)
                    }
                    None => Session::Anonymous,
                };
                if self.comments.is_open() && self.comments.comments.is_empty() {
                    self.load_comments();
                }
            }
            AsyncResult::Comments { article_id, result } => {
                let is_current = self
                    .comments
                    .article_index
                    .and_then(|i| self.articles().get(i))
                    .and_then(|a| a.id.as_ref())
                    == Some(&article_id);
                if !is_current {
                    debug!(%article_id, "discarding comments for closed panel");
                    return;
                }
                self.comments.loading = false;
                match result {
                    Ok(comments) => self.comments.comments = comments,
                    Err(e) => {
                        warn!(%article_id, "Failed to fetch comments: {e}");
                        self.comments.error = Some(e.user_message());
                    }
                }
            }
        }
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::SelectNext => {
                self.select_next();
                self.emit_scroll();
            }
            Message::SelectPrev => {
                self.select_prev();
                self.emit_scroll();
            }
            Message::SelectFirst => {
                self.selected_index = 0;
                self.emit_scroll();
            }
            Message::SelectLast => {
                self.selected_index = self.articles().len().saturating_sub(1);
                self.emit_scroll();
            }
            Message::PageDown => {
                let last = self.articles().len().saturating_sub(1);
                self.selected_index = (self.selected_index + Self::PAGE_STEP).min(last);
                self.emit_scroll();
            }
            Message::PageUp => {
                self.selected_index = self.selected_index.saturating_sub(Self::PAGE_STEP);
                self.emit_scroll();
            }
            Message::OpenUrl => self.open_url(),
            Message::ToggleComments => self.toggle_comments(),
            Message::Back => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.comments.close();
                }
            }
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::ToggleDebug => {
                self.show_debug = !self.show_debug;
                self.ensure_visible();
            }
            Message::LoadMore => {
                self.feed.load_more();
            }
            Message::Resize { width, height } => {
                self.viewport_height = Some(height);
                for msg in self.viewport.emit_resize(width) {
                    self.update(msg);
                }
                self.ensure_visible();
            }
            Message::LayoutChanged(class) => {
                if class != self.layout {
                    debug!(layout = class.label(), "layout changed");
                    self.layout = class;
                }
                self.ensure_visible();
            }
        }
    }

    fn select_next(&mut self) {
        let count = self.articles().len();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Rows available to the article list, borders excluded.
    pub fn list_height(&self) -> usize {
        let debug = if self.show_debug { Self::DEBUG_PANE_HEIGHT } else { 0 };
        self.viewport_height
            .map(|h| h.saturating_sub(Self::LAYOUT_OVERHEAD + debug) as usize)
            .unwrap_or(0)
    }

    /// Articles that fit in the list at the current layout.
    pub fn visible_capacity(&self) -> usize {
        (self.list_height() / self.layout.rows_per_article()).max(1)
    }

    fn ensure_visible(&mut self) {
        let capacity = self.visible_capacity();
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + capacity {
            self.scroll_offset = self.selected_index + 1 - capacity;
        }
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        let rows = self.layout.rows_per_article();
        ScrollMetrics {
            viewport_height: self.list_height(),
            scroll_offset: self.scroll_offset * rows,
            content_height: self.articles().len() * rows,
        }
    }

    /// Scroll position changed: bring the selection into view and notify listeners.
    fn emit_scroll(&mut self) {
        self.ensure_visible();
        for msg in self.viewport.emit_scroll(&self.scroll_metrics()) {
            self.update(msg);
        }
    }

    fn open_url(&self) {
        if let Some(url) = self
            .selected_article()
            .and_then(|a| a.url.as_deref())
            .filter(|u| !u.is_empty())
            && let Err(e) = open::that(url)
        {
            warn!(url, "Failed to open browser: {e}");
        }
    }

    fn toggle_comments(&mut self) {
        if self.comments.is_open() {
            self.comments.close();
            return;
        }
        if self.selected_article().is_none() {
            return;
        }
        self.comments.article_index = Some(self.selected_index);
        self.load_comments();
    }

    fn load_comments(&mut self) {
        if self.session.user().is_none() {
            return;
        }
        let Some(id) = self
            .comments
            .article_index
            .and_then(|i| self.articles().get(i))
            .and_then(|a| a.id.clone())
        else {
            return;
        };
        self.comments.loading = true;
        self.comments.error = None;
        self.spawn_comments_fetch(id);
    }

    /// Ask the backend who we are. Anonymous users get a login prompt instead of comments.
    pub fn load_session(&mut self) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let user = client.fetch_user().await;
            let _ = tx.send(AsyncResult::User(user)).await;
        });
    }

    fn spawn_comments_fetch(&mut self, article_id: ItemId) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        debug!(%article_id, "loading comments");
        tokio::spawn(async move {
            let result = client.try_fetch_comments(&article_id).await;
            let _ = tx.send(AsyncResult::Comments { article_id, result }).await;
        });
    }
}
