pub mod metrics;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

// ─── Unified error type ──────────────────────────────────────────

/// The only way a scrape can fail once it reaches a handler. Upstream
/// problems never get here; they just shrink the metric set.
#[derive(Debug)]
pub enum AppError {
    Encode(prometheus::Error),
}

impl From<prometheus::Error> for AppError {
    fn from(e: prometheus::Error) -> Self {
        Self::Encode(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Encode(e) => {
                error!(error = %e, "failed to encode metrics");
                format!("failed to encode metrics: {e}")
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
