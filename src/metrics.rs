// src/metrics.rs
use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn describe_once() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Articles parsed from feeds.");
        describe_counter!(
            "ingest_source_errors_total",
            "Feed fetches that failed or timed out."
        );
        describe_counter!("ingest_parse_errors_total", "Feeds whose XML did not parse.");
        describe_histogram!("ingest_fetch_ms", "Per-source fetch time in milliseconds.");
        describe_histogram!("ingest_parse_ms", "Per-feed parse time in milliseconds.");
        describe_gauge!("ingest_last_run_ts", "Unix ts when ingest last ran.");
        describe_counter!("classify_articles_total", "Articles run through the classifier.");
        describe_counter!("classify_events_total", "Articles that became events.");
        describe_counter!(
            "classify_dropped_total",
            "Articles dropped, labelled by pipeline stage."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        describe_once();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
