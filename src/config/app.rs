// src/config/app.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::rss::DEFAULT_MAX_ITEMS;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Runtime settings read from the environment (after `.env`).
/// Reference-data paths are resolved by their own loaders.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Per-source fetch deadline.
    pub fetch_timeout: Duration,
    /// Items taken from the head of each feed.
    pub max_items_per_feed: usize,
    /// Served for any path the API does not own; `None` disables it.
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_items_per_feed: DEFAULT_MAX_ITEMS,
            static_dir: Some(PathBuf::from(DEFAULT_STATIC_DIR)),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();

        let fetch_timeout = get("FETCH_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&s| s > 0)
            .map(Duration::from_secs)
            .unwrap_or(d.fetch_timeout);

        let max_items_per_feed = get("MAX_ITEMS_PER_FEED")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(d.max_items_per_feed);

        // STATIC_DIR="" turns static serving off.
        let static_dir = match get("STATIC_DIR") {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(PathBuf::from(s.trim())),
            None => d.static_dir,
        };

        Self {
            fetch_timeout,
            max_items_per_feed,
            static_dir,
        }
    }
}
