use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{Article, ArticleSource};
use crate::pagination::{LoadState, Paginator};

/// A page that came back from the source.
#[derive(Debug)]
pub struct PageLoaded {
    pub page: u32,
    pub articles: Vec<Article>,
}

/// What happened when a page result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub page: u32,
    pub count: usize,
    pub initial: bool,
}

/// Drives a [`Paginator`] against an [`ArticleSource`].
///
/// Fetches run on spawned tasks and report back over a channel, so the owner
/// keeps handling input while a page is in flight. Results are only merged via
/// [`FeedController::poll`] or [`FeedController::settle`].
pub struct FeedController {
    query: String,
    paginator: Paginator,
    source: Arc<dyn ArticleSource>,
    result_tx: mpsc::Sender<PageLoaded>,
    result_rx: mpsc::Receiver<PageLoaded>,
    cancel: CancellationToken,
}

impl FeedController {
    pub fn new(source: Arc<dyn ArticleSource>, query: impl Into<String>) -> Self {
        let (result_tx, result_rx) = mpsc::channel(4);
        Self {
            query: query.into(),
            paginator: Paginator::new(),
            source,
            result_tx,
            result_rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn articles(&self) -> &[Article] {
        self.paginator.articles()
    }

    pub fn state(&self) -> LoadState {
        self.paginator.state()
    }

    pub fn cursor(&self) -> u32 {
        self.paginator.cursor()
    }

    pub fn in_flight(&self) -> Option<u32> {
        self.paginator.in_flight()
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Kick off the initial load. Returns true if a fetch was spawned.
    pub fn start(&mut self) -> bool {
        if self.is_torn_down() {
            return false;
        }
        match self.paginator.start() {
            Some(page) => {
                info!(query = %self.query, "loading articles");
                self.spawn_fetch(page);
                true
            }
            None => {
                debug!(state = self.state().label(), "start ignored");
                false
            }
        }
    }

    /// Request the next page. Returns true if a fetch was spawned.
    pub fn load_more(&mut self) -> bool {
        if self.is_torn_down() {
            return false;
        }
        match self.paginator.load_more() {
            Some(page) => {
                debug!(query = %self.query, page, "loading more articles");
                self.spawn_fetch(page);
                true
            }
            None => false,
        }
    }

    fn spawn_fetch(&self, page: u32) {
        let source = Arc::clone(&self.source);
        let query = self.query.clone();
        let tx = self.result_tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(page, "fetch abandoned after teardown");
                }
                articles = source.fetch_page(&query, page) => {
                    let _ = tx.send(PageLoaded { page, articles }).await;
                }
            }
        });
    }

    /// Merge one result. Discarded after teardown or when stale.
    pub fn apply(&mut self, loaded: PageLoaded) -> Option<Settled> {
        if self.is_torn_down() {
            debug!(page = loaded.page, "discarding page after teardown");
            return None;
        }
        let initial = self.paginator.state() == LoadState::LoadingInitial;
        let page = loaded.page;
        let count = loaded.articles.len();
        if !self.paginator.resolve(page, loaded.articles) {
            debug!(page, "discarding stale page");
            return None;
        }
        debug!(page, count, total = self.articles().len(), "page merged");
        Some(Settled {
            page,
            count,
            initial,
        })
    }

    /// Apply every result that has already arrived, without waiting.
    pub fn poll(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Ok(loaded) = self.result_rx.try_recv() {
            settled.extend(self.apply(loaded));
        }
        settled
    }

    /// Wait for the next result and apply it. Returns `None` if it was discarded.
    #[cfg(test)]
    pub async fn settle(&mut self) -> Option<Settled> {
        let loaded = self.result_rx.recv().await?;
        self.apply(loaded)
    }

    /// Preload page 0 without touching the source.
    #[cfg(test)]
    pub fn seed(&mut self, articles: Vec<Article>) {
        self.paginator.start();
        self.paginator.resolve(0, articles);
    }

    /// Stop the session: in-flight fetches are abandoned and later calls are no-ops.
    pub fn teardown(&mut self) {
        if !self.cancel.is_cancelled() {
            info!(query = %self.query, articles = self.articles().len(), "feed torn down");
            self.cancel.cancel();
        }
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
