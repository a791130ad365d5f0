// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod rss;
pub mod types;

use crate::ingest::types::{RawArticle, SourceError, SourceProvider};
use futures::future::join_all;
use metrics::{counter, gauge, histogram};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Strip markup: decode entities, drop tags, fold quotes and whitespace.
pub fn strip_html(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::Lazy<regex::Regex> =
        once_cell::sync::Lazy::new(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = RE_TAGS.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::Lazy<regex::Regex> =
        once_cell::sync::Lazy::new(|| regex::Regex::new(r"\s+").expect("ws regex"));
    out = RE_WS.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// Cut to at most `max` chars (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Outcome of one source within a run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub articles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// All articles, in source order then feed order.
    #[serde(skip)]
    pub articles: Vec<RawArticle>,
    pub sources: Vec<SourceReport>,
    /// Sources that delivered at least one article.
    pub succeeded: usize,
    pub failed: usize,
}

/// Fetch every source in parallel, each under its own `timeout`.
/// A failing source contributes nothing; the run always completes.
pub async fn run_once(providers: &[Box<dyn SourceProvider>], timeout: Duration) -> IngestReport {
    crate::metrics::describe_once();

    let fetches = providers.iter().map(|p| async move {
        let t0 = Instant::now();
        let res = tokio::time::timeout(timeout, p.fetch_articles())
            .await
            .unwrap_or(Err(SourceError::Timeout(timeout)));
        (p.name(), res, t0.elapsed())
    });
    let results = join_all(fetches).await;

    let mut report = IngestReport::default();
    for (name, res, elapsed) in results {
        histogram!("ingest_fetch_ms").record(elapsed.as_secs_f64() * 1_000.0);
        match res {
            Ok(mut items) => {
                let n = items.len();
                if n > 0 {
                    report.succeeded += 1;
                    tracing::info!(target: "ingest", source = name, articles = n, "source fetched");
                } else {
                    report.failed += 1;
                    tracing::warn!(target: "ingest", source = name, "source returned no articles");
                }
                report.articles.append(&mut items);
                report.sources.push(SourceReport {
                    name: name.to_string(),
                    articles: n,
                    error: None,
                });
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!(target: "ingest", error = %e, source = name, "source failed");
                counter!("ingest_source_errors_total").increment(1);
                report.sources.push(SourceReport {
                    name: name.to_string(),
                    articles: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let now = chrono::Utc::now().timestamp().max(0) as u64;
    gauge!("ingest_last_run_ts").set(now as f64);
    tracing::info!(
        target: "ingest",
        total = report.articles.len(),
        succeeded = report.succeeded,
        failed = report.failed,
        "ingest run finished"
    );
    report
}
