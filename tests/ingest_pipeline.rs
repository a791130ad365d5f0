// tests/ingest_pipeline.rs
use async_trait::async_trait;
use conflict_event_feed::ingest::providers::RssFeedProvider;
use conflict_event_feed::ingest::run_once;
use conflict_event_feed::{RawArticle, SourceError, SourceProvider};
use std::time::Duration;

const WORLD_RSS: &str = include_str!("fixtures/world_rss.xml");

struct Slow;

#[async_trait]
impl SourceProvider for Slow {
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>, SourceError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(vec![])
    }
    fn name(&self) -> &str {
        "Slow Wire"
    }
}

struct Broken;

#[async_trait]
impl SourceProvider for Broken {
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>, SourceError> {
        Err(SourceError::Http {
            url: "https://broken.invalid".into(),
            message: "dns error".into(),
        })
    }
    fn name(&self) -> &str {
        "Broken Wire"
    }
}

#[tokio::test]
async fn articles_keep_source_then_feed_order() {
    let second = r#"<rss version="2.0"><channel>
        <item><title>Shelling hits Kharkiv</title></item>
    </channel></rss>"#;
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(RssFeedProvider::from_fixture("First", WORLD_RSS).with_max_items(2)),
        Box::new(RssFeedProvider::from_fixture("Second", second)),
    ];

    let report = run_once(&providers, Duration::from_secs(1)).await;
    let titles: Vec<(&str, &str)> = report
        .articles
        .iter()
        .map(|a| (a.source_name.as_str(), a.title.as_str()))
        .collect();
    assert_eq!(
        titles,
        vec![
            ("First", "Breaking: Airstrike kills 120 in Kyiv"),
            ("First", "New smartphone unveiled in Cupertino"),
            ("Second", "Shelling hits Kharkiv"),
        ]
    );
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn slow_and_broken_sources_do_not_sink_the_run() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(Slow),
        Box::new(Broken),
        Box::new(RssFeedProvider::from_fixture("World Desk", WORLD_RSS)),
    ];

    let report = run_once(&providers, Duration::from_millis(50)).await;
    assert_eq!(report.articles.len(), 6);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 2);

    assert_eq!(report.sources[0].name, "Slow Wire");
    assert!(report.sources[0]
        .error
        .as_deref()
        .is_some_and(|e| e.contains("timed out")));
    assert!(report.sources[1].error.is_some());
    assert_eq!(report.sources[2].articles, 6);
    assert!(report.sources[2].error.is_none());
}

#[tokio::test]
async fn empty_or_malformed_feed_counts_as_failed() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(RssFeedProvider::from_fixture("Empty", "<rss><channel></channel></rss>")),
        Box::new(RssFeedProvider::from_fixture("Garbage", "<<<not xml")),
    ];
    let report = run_once(&providers, Duration::from_secs(1)).await;
    assert!(report.articles.is_empty());
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 2);
    assert!(report.sources.iter().all(|s| s.error.is_none()));
}
