use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier. The backend may hand out numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub headline: String,
    pub snippet: String,
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        rename = "publishedDate",
        alias = "published_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_date: Option<String>,
    #[serde(rename = "commentCount", alias = "comment_count")]
    pub comment_count: u32,
}

impl Article {
    pub fn domain(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty()).and_then(|u| {
            u.split("://")
                .nth(1)
                .and_then(|s| s.split('/').next())
                .map(|s| s.strip_prefix("www.").unwrap_or(s))
        })
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|u| !u.is_empty())
    }

    /// Snippet with HTML entities decoded. The upstream search API escapes them.
    pub fn snippet_text(&self) -> String {
        html_escape::decode_html_entities(&self.snippet).to_string()
    }

    pub fn headline_text(&self) -> String {
        html_escape::decode_html_entities(&self.headline).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    #[cfg_attr(not(test), allow(dead_code))]
    pub id: ItemId,
    #[serde(default)]
    pub text: String,
    #[serde(default = "anonymous")]
    pub user: String,
}

fn anonymous() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub email: String,
}
