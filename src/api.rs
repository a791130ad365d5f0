// src/api.rs
//! HTTP surface: live feed classification, ad-hoc classification, health.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use shuttle_axum::axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::ingest::config::load_feeds_default;
use crate::ingest::providers::http_providers;
use crate::ingest::types::{RawArticle, SourceProvider};
use crate::pipeline::{ClassifyStats, Classifier, ConflictEvent};

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub sources: Arc<Vec<Box<dyn SourceProvider>>>,
    pub fetch_timeout: Duration,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(classifier: Classifier, sources: Vec<Box<dyn SourceProvider>>) -> Self {
        Self {
            classifier: Arc::new(classifier),
            sources: Arc::new(sources),
            fetch_timeout: AppConfig::default().fetch_timeout,
            static_dir: None,
        }
    }

    /// Reference tables and feed list from env/config, HTTP providers for every feed.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let classifier = Classifier::from_env()?;
        let feeds = load_feeds_default()?;
        let sources = http_providers(&feeds, cfg.fetch_timeout, cfg.max_items_per_feed)?;
        tracing::info!(
            target: "api",
            feeds = feeds.len(),
            locations = classifier.gazetteer().len(),
            "state ready"
        );
        Ok(Self {
            classifier: Arc::new(classifier),
            sources: Arc::new(sources),
            fetch_timeout: cfg.fetch_timeout,
            static_dir: cfg.static_dir.clone(),
        })
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/events", get(events))
        .route("/api/classify", post(classify))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
        };
        let body = ErrorBody {
            success: false,
            error: msg,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        ApiError::BadRequest(rej.body_text())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceCounts {
    succeeded: usize,
    failed: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventsResp {
    success: bool,
    count: usize,
    events: Vec<ConflictEvent>,
    stats: ClassifyStats,
    sources: SourceCounts,
    last_updated: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyResp {
    success: bool,
    count: usize,
    events: Vec<ConflictEvent>,
    stats: ClassifyStats,
}

#[derive(Serialize)]
struct HealthResp {
    status: &'static str,
    timestamp: String,
}

async fn health() -> Json<HealthResp> {
    Json(HealthResp {
        status: "OK",
        timestamp: now_rfc3339(),
    })
}

async fn events(State(state): State<AppState>) -> Json<EventsResp> {
    let report = crate::ingest::run_once(&state.sources, state.fetch_timeout).await;
    let outcome = state.classifier.classify(&report.articles);

    tracing::info!(
        target: "api",
        articles = report.articles.len(),
        events = outcome.events.len(),
        succeeded = report.succeeded,
        failed = report.failed,
        "events served"
    );

    Json(EventsResp {
        success: true,
        count: outcome.events.len(),
        events: outcome.events,
        stats: outcome.stats,
        sources: SourceCounts {
            succeeded: report.succeeded,
            failed: report.failed,
        },
        last_updated: now_rfc3339(),
    })
}

async fn classify(
    State(state): State<AppState>,
    body: Result<Json<Vec<RawArticle>>, JsonRejection>,
) -> Result<Json<ClassifyResp>, ApiError> {
    let Json(articles) = body.map_err(|rej| {
        tracing::warn!(target: "api", error = %rej.body_text(), "classify: bad body");
        ApiError::from(rej)
    })?;

    let outcome = state.classifier.classify(&articles);
    Ok(Json(ClassifyResp {
        success: true,
        count: outcome.events.len(),
        events: outcome.events,
        stats: outcome.stats,
    }))
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
