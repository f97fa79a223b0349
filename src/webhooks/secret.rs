//! Shared-secret authorization for inbound webhooks.
//!
//! Each inbound webhook is protected by its own shared secret. Callers send
//! it either in a per-system header (`x-jira-secret`, `x-teams-secret`) or in
//! a `secret` query parameter. The header wins when both are present.
//!
//! Authorization is the first step in webhook processing; unauthorized
//! requests are rejected before the body is parsed.

use axum::http::HeaderMap;
use serde::Deserialize;
use subtle::ConstantTimeEq;

/// Header carrying the secret for tracker-originated webhooks.
pub const HEADER_JIRA_SECRET: &str = "x-jira-secret";

/// Header carrying the secret for chat-originated webhooks.
pub const HEADER_TEAMS_SECRET: &str = "x-teams-secret";

/// Query string of an inbound webhook; only `secret` is read.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SecretQuery {
    pub secret: Option<String>,
}

/// Returns the secret the caller presented, from `header_name` or the query.
///
/// Empty header values are treated as absent.
pub fn provided_secret<'a>(
    headers: &'a HeaderMap,
    query: &'a SecretQuery,
    header_name: &str,
) -> Option<&'a str> {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .or(query.secret.as_deref())
}

/// Verifies a presented secret against the configured one.
///
/// Returns `false` when the configured secret is empty (the endpoint is
/// closed), when nothing was presented, or when the values differ. Uses
/// constant-time comparison.
///
/// # Examples
///
/// ```
/// use teams_jira_bridge::webhooks::verify_secret;
///
/// assert!(verify_secret(Some("s3cret"), "s3cret"));
/// assert!(!verify_secret(Some("wrong"), "s3cret"));
/// assert!(!verify_secret(None, "s3cret"));
/// // An unconfigured secret rejects everything, including an empty one.
/// assert!(!verify_secret(Some(""), ""));
/// ```
pub fn verify_secret(provided: Option<&str>, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    match provided {
        Some(provided) => provided.as_bytes().ct_eq(expected.as_bytes()).into(),
        None => false,
    }
}
