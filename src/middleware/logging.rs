//! Request logging middleware.
//!
//! One line per HTTP request with method, path, status, latency and, once the
//! auth gates have run, the caller's email.

use axum::{body::Body, extract::ConnectInfo, http::Request, middleware::Next, response::Response};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::auth::models::Claims;

/// Middleware that logs HTTP requests with timing information.
///
/// 5xx responses log at WARN, everything else at INFO. Each request runs inside
/// an `http_request` span carrying a fresh request id.
pub async fn request_logging(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Skip logging for health checks to reduce noise
    if path == "/health" {
        return next.run(request).await;
    }

    let client_ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    let span = tracing::info_span!(
        "http_request",
        request_id = %Uuid::new_v4(),
        client_ip = %client_ip,
    );

    let start = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    // Set by require_auth / require_owner on the way out
    let caller = response
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.email.as_str())
        .unwrap_or("-");

    let _entered = span.enter();
    if status >= 500 {
        warn!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency_ms,
            caller = caller,
            "Request failed (5xx)"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency_ms,
            caller = caller,
            "Request completed"
        );
    }

    response
}
