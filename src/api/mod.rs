mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::{DEFAULT_BASE_URL, FETCH_ARTICLES_ERROR, NewsClient};
pub use error::ApiError;
pub use types::{Article, Comment, ItemId, User};

/// Anything that can produce one page of articles for a query.
///
/// Implementations never fail: transport, status and parse errors are logged
/// and surface as an empty page. The pagination controller depends only on
/// this trait so tests can script page contents and latency.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_page(&self, query: &str, page: u32) -> Vec<Article>;
}
