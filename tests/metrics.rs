// tests/metrics.rs
// Installs the global recorder, so it only runs with `--features strict-metrics`.
#![cfg(feature = "strict-metrics")]

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use conflict_event_feed::metrics::Metrics;
use conflict_event_feed::{Classifier, RawArticle};
use tower::ServiceExt;

#[tokio::test]
async fn metrics_endpoint_contains_classify_series() {
    let metrics = Metrics::init().expect("recorder installs once per process");

    let articles = vec![
        RawArticle {
            title: "Militants attack checkpoint in Mosul".into(),
            description: String::new(),
            published_at: None,
            source_name: "Test".into(),
            article_url: String::new(),
        },
        RawArticle {
            title: "New smartphone unveiled in Cupertino".into(),
            description: String::new(),
            published_at: None,
            source_name: "Test".into(),
            article_url: String::new(),
        },
    ];
    let out = Classifier::builtin().unwrap().classify(&articles);
    assert_eq!(out.stats.events, 1);

    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = metrics.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    for name in [
        "classify_articles_total",
        "classify_events_total",
        "classify_dropped_total",
    ] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
    assert!(text.contains(r#"stage="no_keyword""#), "{text}");
}
