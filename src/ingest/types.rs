// src/ingest/types.rs
use std::time::Duration;

/// One article as a feed delivered it. Never modified after fetch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_at: Option<String>, // as found in the feed (RFC 2822 for RSS)
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub article_url: String,
}

/// Per-source failure. Never fatal: the run continues without that source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Parsed articles; a malformed feed yields `Ok(vec![])`.
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>, SourceError>;
    fn name(&self) -> &str;
}
