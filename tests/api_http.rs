// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /api/classify (ok + malformed body)
// - GET /api/events (fixture feed + dead source)
// - static fallback

use async_trait::async_trait;
use serde_json::json;
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use conflict_event_feed::api::{self, AppState};
use conflict_event_feed::ingest::providers::RssFeedProvider;
use conflict_event_feed::{Classifier, RawArticle, SourceError, SourceProvider};

const BODY_LIMIT: usize = 1024 * 1024;
const WORLD_RSS: &str = include_str!("fixtures/world_rss.xml");

struct Unreachable;

#[async_trait]
impl SourceProvider for Unreachable {
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>, SourceError> {
        Err(SourceError::Status {
            url: "https://down.invalid/rss".into(),
            status: 503,
        })
    }
    fn name(&self) -> &str {
        "Down Wire"
    }
}

fn test_router(sources: Vec<Box<dyn SourceProvider>>) -> Router {
    let classifier = Classifier::builtin().expect("builtin tables");
    api::create_router(AppState::new(classifier, sources))
}

async fn read_json(resp: shuttle_axum::axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_classify(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/classify")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("build POST /api/classify")
}

#[tokio::test]
async fn health_reports_ok_with_timestamp() {
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = test_router(vec![]).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["status"], "OK");
    let ts = v["timestamp"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "bad ts {ts}");
}

#[tokio::test]
async fn classify_returns_events_and_stats() {
    let payload = json!([
        {
            "title": "Breaking: Airstrike kills 120 in Kyiv",
            "description": "military forces launched a strike today",
            "publishedAt": "Fri, 16 Oct 2026 08:30:00 +0000",
            "sourceName": "BBC World",
            "articleUrl": "https://news.example/kyiv"
        },
        { "title": "New smartphone unveiled in Cupertino" }
    ]);

    let resp = test_router(vec![])
        .oneshot(post_classify(payload.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["count"], 1);
    assert_eq!(v["stats"]["totalArticles"], 2);
    assert_eq!(v["stats"]["droppedNoKeyword"], 1);

    let e = &v["events"][0];
    assert_eq!(e["id"], 1);
    assert_eq!(e["location"], "Kyiv");
    assert_eq!(e["severity"], "critical");
    assert_eq!(e["category"], "conflict");
    assert_eq!(e["date"], "2026-10-16");
    assert_eq!(e["sources"], 1);
    assert_eq!(e["sourceName"], "BBC World");
    assert_eq!(e["articleUrl"], "https://news.example/kyiv");
    assert!(e["lat"].is_f64() && e["lng"].is_f64());
}

#[tokio::test]
async fn malformed_classify_body_is_400() {
    let resp = test_router(vec![])
        .oneshot(post_classify("{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = read_json(resp).await;
    assert_eq!(v["success"], false);
    assert!(v["error"].as_str().is_some_and(|s| !s.is_empty()));

    // Valid JSON of the wrong shape is rejected the same way.
    let resp = test_router(vec![])
        .oneshot(post_classify(r#"{"title":"not an array"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn events_ingests_then_classifies() {
    let sources: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(RssFeedProvider::from_fixture("World Desk", WORLD_RSS)),
        Box::new(Unreachable),
    ];
    let req = Request::builder()
        .uri("/api/events")
        .body(Body::empty())
        .unwrap();
    let resp = test_router(sources).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["sources"]["succeeded"], 1);
    assert_eq!(v["sources"]["failed"], 1);
    assert!(v["lastUpdated"].is_string());

    let stats = &v["stats"];
    assert_eq!(stats["totalArticles"], 6);
    assert_eq!(stats["droppedNoKeyword"], 1);
    assert_eq!(stats["droppedNoLocation"], 1);
    assert_eq!(stats["droppedInvalidator"], 1);
    assert_eq!(stats["droppedLowScore"], 1);
    assert_eq!(stats["events"], 2);
    assert_eq!(v["count"], 2);

    let events = v["events"].as_array().unwrap();
    assert_eq!(events[0]["location"], "Kyiv");
    assert_eq!(events[0]["sourceName"], "World Desk");
    assert_eq!(events[1]["location"], "Tehran");
    assert_eq!(events[1]["category"], "protest");
}

#[tokio::test]
async fn events_with_no_sources_is_empty_not_an_error() {
    let req = Request::builder()
        .uri("/api/events")
        .body(Body::empty())
        .unwrap();
    let sources: Vec<Box<dyn SourceProvider>> = vec![Box::new(Unreachable)];
    let resp = test_router(sources)
        .oneshot(req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["count"], 0);
    assert_eq!(v["events"], json!([]));
    assert_eq!(v["stats"]["totalArticles"], 0);
}

#[tokio::test]
async fn unknown_paths_fall_back_to_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>map</h1>").unwrap();

    let state = AppState::new(Classifier::builtin().unwrap(), vec![]).with_static_dir(dir.path());
    let app = api::create_router(state);

    let req = Request::builder()
        .uri("/index.html")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>map</h1>");
}
