//! Page cursor and loading-state bookkeeping for infinite scroll.
//!
//! [`Paginator`] performs no I/O. `start` and `load_more` answer "which page
//! should be fetched now, if any", and `resolve` merges a finished page back
//! in. The single-flight rule lives here: nothing new is handed out while a
//! page is in flight, so pages are appended in cursor order no matter how long
//! each fetch takes.

use crate::api::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    LoadingInitial,
    LoadingMore,
}

impl LoadState {
    pub fn is_idle(self) -> bool {
        self == LoadState::Idle
    }

    pub fn label(self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::LoadingInitial => "loading initial",
            LoadState::LoadingMore => "loading more",
        }
    }
}

#[derive(Debug, Default)]
pub struct Paginator {
    cursor: u32,
    articles: Vec<Article>,
    state: LoadState,
    in_flight: Option<u32>,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn in_flight(&self) -> Option<u32> {
        self.in_flight
    }

    /// Begin the initial load. Returns page 0, or `None` if a load is already running.
    pub fn start(&mut self) -> Option<u32> {
        if !self.state.is_idle() {
            return None;
        }
        self.state = LoadState::LoadingInitial;
        self.in_flight = Some(0);
        Some(0)
    }

    /// Advance the cursor and return the page to fetch, or `None` while busy.
    pub fn load_more(&mut self) -> Option<u32> {
        if !self.state.is_idle() {
            return None;
        }
        self.state = LoadState::LoadingMore;
        self.cursor += 1;
        self.in_flight = Some(self.cursor);
        Some(self.cursor)
    }

    /// Merge a finished page. Results for any page other than the one in
    /// flight are stale and ignored; returns whether the page was applied.
    pub fn resolve(&mut self, page: u32, articles: Vec<Article>) -> bool {
        if self.in_flight != Some(page) {
            return false;
        }
        self.articles.extend(articles);
        self.in_flight = None;
        self.state = LoadState::Idle;
        true
    }
}
