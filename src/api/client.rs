use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use tracing::{debug, error};

use super::ArticleSource;
use super::error::ApiError;
use super::types::{Article, Comment, ItemId, User};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Log prefix for article fetch failures. Kept stable so logs can be grepped.
pub const FETCH_ARTICLES_ERROR: &str = "Failed to fetch articles";
const FETCH_USER_ERROR: &str = "Failed to fetch user";

/// Client for the backend proxy that fronts the article search API.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<String>,
}

impl NewsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        }
    }

    /// Session cookie sent with user and comment requests, e.g. `session=abc`.
    pub fn with_session(mut self, cookie: Option<String>) -> Self {
        self.session = cookie.filter(|c| !c.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session {
            Some(cookie) => req.header(COOKIE, cookie),
            None => req,
        }
    }

    /// Fetch one page of articles, surfacing the failure kind.
    pub async fn try_fetch_page(&self, query: &str, page: u32) -> Result<Vec<Article>, ApiError> {
        debug!(query, page, "fetching articles");
        let page_param = page.to_string();
        let articles = self
            .http
            .get(self.endpoint("/api/articles"))
            .query(&[("q", query), ("page", page_param.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Article>>()
            .await?;
        debug!(query, page, count = articles.len(), "fetched articles");
        Ok(articles)
    }

    /// Current signed-in user, or `None` when the backend says we are anonymous.
    pub async fn fetch_user(&self) -> Option<User> {
        self.try_fetch_user().await.unwrap_or_else(|e| {
            error!("{FETCH_USER_ERROR}: {e}");
            None
        })
    }

    async fn try_fetch_user(&self) -> Result<Option<User>, ApiError> {
        let resp = self
            .authed(self.http.get(self.endpoint("/api/user")))
            .send()
            .await?;
        if !resp.status().is_success() {
            debug!(status = resp.status().as_u16(), "no active session");
            return Ok(None);
        }
        Ok(Some(resp.json::<User>().await?))
    }

    /// Ids are opaque (`nyt://article/...`), so the id is escaped as a single path segment.
    fn comments_url(&self, article_id: &ItemId) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::Network(format!("invalid base url: {e}")))?;
        let id = article_id.to_string();
        url.path_segments_mut()
            .map_err(|()| ApiError::Network("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["api", "articles", id.as_str(), "comments"]);
        Ok(url)
    }

    pub async fn try_fetch_comments(&self, article_id: &ItemId) -> Result<Vec<Comment>, ApiError> {
        let url = self.comments_url(article_id)?;
        let comments = self
            .authed(self.http.get(url))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Comment>>()
            .await?;
        Ok(comments)
    }
}

impl Default for NewsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl ArticleSource for NewsClient {
    async fn fetch_page(&self, query: &str, page: u32) -> Vec<Article> {
        match self.try_fetch_page(query, page).await {
            Ok(articles) => articles,
            Err(e) => {
                error!(kind = e.kind(), query, page, "{FETCH_ARTICLES_ERROR}: {e}");
                Vec::new()
            }
        }
    }
}
