use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, warn};

/// Stamps each response with a `Server-Timing` header and logs one line
/// per request. Server errors are logged at `warn`, everything else at
/// `debug` since Prometheus scrapes on a short interval.
pub async fn timing_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();

    let server_timing = format!("total;dur={:.3}", elapsed.as_secs_f64() * 1000.0);
    if let Ok(val) = HeaderValue::from_str(&server_timing) {
        response.headers_mut().insert("server-timing", val);
    }

    let status = response.status();
    let elapsed_ms = elapsed.as_millis() as u64;
    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        debug!(%method, %path, status = status.as_u16(), elapsed_ms, "request served");
    }

    response
}
