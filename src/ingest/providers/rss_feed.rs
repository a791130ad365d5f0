// src/ingest/providers/rss_feed.rs
use async_trait::async_trait;
use std::time::Duration;

use crate::ingest::rss::{parse_feed, DEFAULT_MAX_ITEMS};
use crate::ingest::types::{RawArticle, SourceError, SourceProvider};

/// An RSS source, either fetched over HTTP or backed by an inline document.
pub struct RssFeedProvider {
    name: String,
    max_items: usize,
    mode: Mode,
}

enum Mode {
    // Inline XML, for tests and offline demos.
    Fixture(String),
    Http {
        url: String,
        client: reqwest::Client,
        timeout: Duration,
    },
}

impl RssFeedProvider {
    pub fn from_fixture(name: &str, xml: &str) -> Self {
        Self {
            name: name.to_string(),
            max_items: DEFAULT_MAX_ITEMS,
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(name: &str, url: &str, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            max_items: DEFAULT_MAX_ITEMS,
            mode: Mode::Http {
                url: url.to_string(),
                client,
                timeout,
            },
        }
    }

    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    async fn fetch_body(
        url: &str,
        client: &reqwest::Client,
        timeout: Duration,
    ) -> Result<String, SourceError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                SourceError::Timeout(timeout)
            } else {
                SourceError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let resp = client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(map_err)
    }
}

#[async_trait]
impl SourceProvider for RssFeedProvider {
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>, SourceError> {
        match &self.mode {
            Mode::Fixture(xml) => Ok(parse_feed(xml, &self.name, self.max_items)),
            Mode::Http {
                url,
                client,
                timeout,
            } => {
                let body = Self::fetch_body(url, client, *timeout).await?;
                Ok(parse_feed(&body, &self.name, self.max_items))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
