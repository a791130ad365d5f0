// src/ingest/providers/mod.rs
pub mod rss_feed;

pub use rss_feed::RssFeedProvider;

use anyhow::Context;
use std::time::Duration;

use crate::ingest::config::FeedSource;
use crate::ingest::types::SourceProvider;

/// Browser-like agent; several news sites refuse obvious bots.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

pub fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("building feed http client")
}

/// One HTTP provider per configured feed, sharing a single client.
pub fn http_providers(
    feeds: &[FeedSource],
    timeout: Duration,
    max_items: usize,
) -> anyhow::Result<Vec<Box<dyn SourceProvider>>> {
    let client = http_client()?;
    Ok(feeds
        .iter()
        .map(|f| {
            Box::new(
                RssFeedProvider::from_url(&f.name, &f.url, client.clone(), timeout)
                    .with_max_items(max_items),
            ) as Box<dyn SourceProvider>
        })
        .collect())
}
