//! Conflict event feed: binary entrypoint.
//! Boots the Axum server under Shuttle with the classifier, feed sources and /metrics.

use conflict_event_feed::{
    api::{self, AppState},
    config::AppConfig,
    logging,
    metrics::Metrics,
};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    logging::init_tracing();

    let cfg = AppConfig::from_env();
    let state = AppState::from_config(&cfg)
        .map_err(|e| shuttle_runtime::Error::Custom(e.context("building app state")))?;
    let metrics = Metrics::init().map_err(shuttle_runtime::Error::Custom)?;

    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
