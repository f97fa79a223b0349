//! Chat webhook endpoint.
//!
//! Accepts messages from the chat channel, parses them into actions and runs
//! them against the tracker. The caller always gets a synchronous answer
//! saying which action was recognized; tracker failures are logged, not
//! surfaced.

use std::future::Future;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use tracing::{error, info};

use super::AppState;
use super::webhook::{WebhookError, authorize, parse_body};
use crate::commands::{normalize_message, parse_action_with_default};
use crate::jira::interpret_action;
use crate::webhooks::{HEADER_TEAMS_SECRET, SecretQuery};

/// Response body when no command grammar matched.
pub const UNPARSED_RESPONSE: &str = "Could not parse action.";

/// The part of a chat webhook payload the bridge reads.
#[derive(Debug, Default, Deserialize)]
pub struct TeamsMessage {
    /// Message text, possibly containing HTML markup.
    #[serde(default)]
    pub text: Option<String>,
}

/// Chat webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Secret: `X-Teams-Secret` header or `secret` query parameter
/// - Body: JSON with a `text` field
///
/// # Response
///
/// - 200 OK `Action '<kind>' received and parsed.`
/// - 200 OK `Could not parse action.` when no command matched
/// - 400 Bad Request: body is not JSON
/// - 401 Unauthorized: missing or wrong secret
/// - 500 Internal Server Error: dispatch failed unexpectedly
///
/// An acknowledgement is posted to the chat channel on a detached task for
/// every authorized message.
pub async fn teams_webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SecretQuery>,
    body: Bytes,
) -> Result<(StatusCode, String), WebhookError> {
    authorize(&headers, &query, HEADER_TEAMS_SECRET, app_state.teams_secret())?;

    let message: TeamsMessage = parse_body(&body)?;
    let raw = message.text.unwrap_or_default();
    let text = normalize_message(&raw, app_state.bot_name());
    let action = parse_action_with_default(&text, app_state.default_project());

    info!(text = %text, action = ?action, "Received Teams webhook");

    // Detached: the response never waits on or reports this post.
    let _ = app_state.notifier().spawn_acknowledgement();

    let Some(action) = action else {
        return Ok((StatusCode::OK, UNPARSED_RESPONSE.to_string()));
    };

    let kind = action.kind();
    let jira = app_state.jira().clone();
    let outcome = run_isolated(async move { interpret_action(&jira, &action).await }).await?;
    if let Err(e) = outcome {
        info!(kind, error = %e, "Tracker call failed; responding success to chat");
    }

    Ok((
        StatusCode::OK,
        format!("Action '{}' received and parsed.", kind),
    ))
}

/// Runs `fut` on its own task so a panic inside it becomes an error value.
async fn run_isolated<F>(fut: F) -> Result<F::Output, WebhookError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(fut).await.map_err(|e| {
        error!(error = %e, "Action dispatch failed");
        WebhookError::Dispatch(e.to_string())
    })
}
