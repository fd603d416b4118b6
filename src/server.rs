use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::middleware::timing;
use crate::AppState;

/// Time allowed on top of the scrape deadline to encode and send the answer.
const RENDER_GRACE: Duration = Duration::from_secs(5);

/// Builds the `Router` serving the scrape endpoint.
///
/// The exporter already stops fetching at `scrape_timeout`, so the outer
/// 408 only fires if rendering itself stalls past `RENDER_GRACE`.
pub fn create_router(state: Arc<AppState>, scrape_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::metrics::index))
        .route("/metrics", get(handlers::metrics::scrape))
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(timing::timing_middleware))
        .layer(TimeoutLayer::new(scrape_timeout + RENDER_GRACE))
}
