//! Liveness and landing endpoints.
//!
//! `/health` returns 200 OK while the server is running, for load balancers
//! and orchestration liveness probes. `/` serves a short page so a browser
//! pointed at the service shows it is up.

use axum::http::StatusCode;
use axum::response::Html;

/// Health check handler.
///
/// # Example
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
///
/// OK
/// ```
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Landing page handler.
pub async fn index_handler() -> Html<&'static str> {
    Html("<h1>JT-Agent is live!</h1><p>Teams &harr; Jira bridge is running.</p>")
}
