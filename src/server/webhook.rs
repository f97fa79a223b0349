//! Tracker webhook endpoint and shared webhook errors.
//!
//! Tracker-originated deliveries are authorized and logged. Forwarding them
//! to the chat channel is not implemented yet.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use super::AppState;
use crate::webhooks::{HEADER_JIRA_SECRET, SecretQuery, provided_secret, verify_secret};

/// Errors that can occur when processing a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing, empty or mismatched shared secret.
    #[error("Unauthorized")]
    Unauthorized,

    /// Body is not valid JSON of the expected shape.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Dispatching a parsed action failed unexpectedly.
    #[error("Error processing action.")]
    Dispatch(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebhookError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            WebhookError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

/// Rejects the request unless it presents `expected` via `header_name` or `?secret=`.
pub(super) fn authorize(
    headers: &HeaderMap,
    query: &SecretQuery,
    header_name: &'static str,
    expected: &str,
) -> Result<(), WebhookError> {
    if verify_secret(provided_secret(headers, query, header_name), expected) {
        Ok(())
    } else {
        warn!(header = header_name, "Rejected webhook with invalid secret");
        Err(WebhookError::Unauthorized)
    }
}

/// Parses a JSON body; an empty body parses as the type's default.
pub(super) fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, WebhookError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Tracker webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Secret: `X-Jira-Secret` header or `secret` query parameter
/// - Body: JSON tracker event (logged, otherwise opaque)
///
/// # Response
///
/// - 200 OK `Received`
/// - 400 Bad Request: body is not JSON
/// - 401 Unauthorized: missing or wrong secret
pub async fn jira_webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SecretQuery>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookError> {
    // Authorize BEFORE parsing.
    authorize(&headers, &query, HEADER_JIRA_SECRET, app_state.jira_secret())?;

    let payload: serde_json::Value = parse_body(&body)?;
    let event = payload
        .get("webhookEvent")
        .and_then(|e| e.as_str())
        .unwrap_or("unknown");

    info!(event, payload = %payload, "Received Jira webhook");

    Ok((StatusCode::OK, "Received"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn authorize_accepts_matching_header() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_JIRA_SECRET, "s".parse().unwrap());
        assert!(authorize(&headers, &SecretQuery::default(), HEADER_JIRA_SECRET, "s").is_ok());
    }

    #[test]
    fn authorize_rejects_missing() {
        let result = authorize(
            &HeaderMap::new(),
            &SecretQuery::default(),
            HEADER_JIRA_SECRET,
            "s",
        );
        assert!(matches!(result, Err(WebhookError::Unauthorized)));
    }

    #[test]
    fn parse_body_empty_is_default() {
        let value: Value = parse_body(b"").unwrap();
        assert_eq!(value, Value::Null);
        let value: Value = parse_body(b"  \n").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn parse_body_json() {
        let value: Value = parse_body(br#"{"webhookEvent":"jira:issue_updated"}"#).unwrap();
        assert_eq!(value, json!({"webhookEvent": "jira:issue_updated"}));
    }

    #[test]
    fn parse_body_invalid() {
        let result: Result<Value, _> = parse_body(b"{not json");
        assert!(matches!(result, Err(WebhookError::InvalidJson(_))));
    }

    #[test]
    fn error_statuses() {
        let status = |e: WebhookError| e.into_response().status();
        assert_eq!(status(WebhookError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(WebhookError::Dispatch("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        assert_eq!(
            status(WebhookError::InvalidJson(json_err)),
            StatusCode::BAD_REQUEST
        );
    }
}
