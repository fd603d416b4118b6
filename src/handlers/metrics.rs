use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::AppError;
use crate::metrics::encode;
use crate::AppState;

// ─── GET /metrics ────────────────────────────────────────────────
/// Polls every coordinator and answers in the Prometheus text format.
/// Unreachable coordinators only make the answer shorter.

pub async fn scrape(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let records = state.exporter.scrape().await;
    let body = encode::render(state.exporter.describe(), &records)?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

// ─── GET / ───────────────────────────────────────────────────────

pub async fn index() -> &'static str {
    "Impala exporter\n\nMetrics are served at /metrics\n"
}
