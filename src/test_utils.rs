//! Test data builders and a scripted article source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::error;

use crate::api::{Article, ArticleSource, FETCH_ARTICLES_ERROR, ItemId, NewsClient};
use crate::app::{App, AppConfig, Session};
use crate::layout::{Breakpoints, LayoutClass};
use crate::time::{Clock, fixed_clock};

/// Fixed timestamp for deterministic tests: 2023-11-15 00:00:00 UTC.
/// Sample articles are published the day before, so they show as "1d ago".
pub const TEST_NOW: i64 = 1700006400;

pub struct ArticleBuilder {
    article: Article,
}

impl Default for ArticleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl ArticleBuilder {
    pub fn new() -> Self {
        Self {
            article: Article {
                id: None,
                headline: "Test Headline".to_string(),
                snippet: "This is a test snippet.".to_string(),
                image: Some("https://example.com/image.jpg".to_string()),
                url: Some("https://www.nytimes.com/2023/11/14/us/test.html".to_string()),
                published_date: Some("2023-11-14T00:00:00+0000".to_string()),
                comment_count: 0,
            },
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.article.id = Some(ItemId::Number(id));
        self
    }

    pub fn headline(mut self, headline: &str) -> Self {
        self.article.headline = headline.to_string();
        self
    }

    pub fn snippet(mut self, snippet: &str) -> Self {
        self.article.snippet = snippet.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.article.url = Some(url.to_string());
        self
    }

    pub fn no_url(mut self) -> Self {
        self.article.url = None;
        self
    }

    pub fn no_image(mut self) -> Self {
        self.article.image = None;
        self
    }

    pub fn published(mut self, date: &str) -> Self {
        self.article.published_date = Some(date.to_string());
        self
    }

    pub fn comments(mut self, count: u32) -> Self {
        self.article.comment_count = count;
        self
    }

    pub fn build(self) -> Article {
        self.article
    }
}

enum Scripted {
    Ready(Vec<Article>),
    Gated(Vec<Article>, Arc<Notify>),
    Failing,
}

/// [`ArticleSource`] with per-page canned responses.
///
/// Unscripted pages come back empty. Gated pages block until
/// [`FakeSource::release`] is called for them. Every call is recorded when it
/// starts, before any gate is awaited.
#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<u32, Scripted>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, articles: Vec<Article>) -> Self {
        self.pages.insert(page, Scripted::Ready(articles));
        self
    }

    pub fn gated_page(mut self, page: u32, articles: Vec<Article>) -> Self {
        self.pages
            .insert(page, Scripted::Gated(articles, Arc::new(Notify::new())));
        self
    }

    /// Behaves like a transport failure: logged, then empty.
    pub fn failing_page(mut self, page: u32) -> Self {
        self.pages.insert(page, Scripted::Failing);
        self
    }

    pub fn release(&self, page: u32) {
        if let Some(Scripted::Gated(_, gate)) = self.pages.get(&page) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.calls().into_iter().map(|(_, page)| page).collect()
    }
}

#[async_trait]
impl ArticleSource for FakeSource {
    async fn fetch_page(&self, query: &str, page: u32) -> Vec<Article> {
        self.calls.lock().unwrap().push((query.to_string(), page));
        match self.pages.get(&page) {
            Some(Scripted::Ready(articles)) => articles.clone(),
            Some(Scripted::Gated(articles, gate)) => {
                gate.notified().await;
                articles.clone()
            }
            Some(Scripted::Failing) => {
                error!(query, page, "{FETCH_ARTICLES_ERROR}: scripted failure");
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}

pub struct TestAppBuilder {
    source: Arc<dyn ArticleSource>,
    articles: Vec<Article>,
    query: String,
    layout: LayoutClass,
    session: Session,
    selected_index: usize,
    viewport_height: Option<u16>,
    show_help: bool,
    clock: Arc<dyn Clock>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            source: Arc::new(FakeSource::new()),
            articles: Vec::new(),
            query: "davis/sacramento".to_string(),
            layout: LayoutClass::Desktop,
            session: Session::Unknown,
            selected_index: 0,
            viewport_height: None,
            show_help: false,
            clock: fixed_clock(TEST_NOW),
        }
    }

    pub fn source(mut self, source: Arc<dyn ArticleSource>) -> Self {
        self.source = source;
        self
    }

    /// Articles already loaded as page 0; the source is not called for them.
    pub fn with_articles(mut self, articles: Vec<Article>) -> Self {
        self.articles = articles;
        self
    }

    pub fn layout(mut self, layout: LayoutClass) -> Self {
        self.layout = layout;
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn build(self) -> App {
        let config = AppConfig {
            query: self.query,
            scroll_threshold: crate::scroll::DEFAULT_THRESHOLD,
            breakpoints: Breakpoints::default(),
        };
        // Nothing listens on port 9; anything that slips through fails fast.
        let client = NewsClient::new("http://127.0.0.1:9");
        let mut app = App::new(config, client, self.source, self.clock);
        if !self.articles.is_empty() {
            app.feed.seed(self.articles);
        }
        app.layout = self.layout;
        app.session = self.session;
        app.selected_index = self.selected_index;
        app.viewport_height = self.viewport_height;
        app.show_help = self.show_help;
        app
    }
}

pub fn sample_articles() -> Vec<Article> {
    vec![
        ArticleBuilder::new()
            .id(1)
            .headline("Sacramento Council Approves New Transit Plan")
            .snippet("The plan adds light rail service between downtown and Davis.")
            .url("https://www.nytimes.com/2023/11/14/us/sacramento-transit.html")
            .comments(12)
            .build(),
        ArticleBuilder::new()
            .id(2)
            .headline("UC Davis Researchers Map Valley Groundwater")
            .snippet("Satellite data shows aquifers recovering after wet winter.")
            .url("https://www.nytimes.com/2023/11/14/science/groundwater.html")
            .comments(4)
            .build(),
        ArticleBuilder::new()
            .id(3)
            .headline("Farmers &amp; Vintners Brace for Early Frost")
            .snippet("Growers in Yolo County &quot;are watching the forecast hourly.&quot;")
            .url("https://www.nytimes.com/2023/11/14/business/frost.html")
            .build(),
        ArticleBuilder::new()
            .id(4)
            .headline("Kings Open Season With Win Over Warriors")
            .snippet("A late three-pointer sealed it.")
            .no_url()
            .comments(88)
            .build(),
        ArticleBuilder::new()
            .id(5)
            .headline("Capitol Park Restoration Nears Completion")
            .snippet("Crews replanted more than 200 trees.")
            .url("https://www.nytimes.com/2023/11/14/us/capitol-park.html")
            .published("2023-11-10")
            .build(),
    ]
}
