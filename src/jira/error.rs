//! Jira API error types.
//!
//! Every tracker operation resolves to `Result<JiraResponse, JiraApiError>`.
//! Failures are values: callers may log them, inspect them, or drop them, but
//! they never unwind past the adapter.

use serde_json::Value;
use thiserror::Error;

use crate::types::IssueKey;

/// A failed tracker call.
#[derive(Debug, Error)]
pub enum JiraApiError {
    /// The tracker answered with a non-2xx status.
    ///
    /// `body` is the decoded error payload, or the raw text as a JSON string
    /// when the payload was not JSON.
    #[error("Jira API error (HTTP {status}): {body}")]
    Api { status: u16, body: Value },

    /// None of the issue's available transitions is named like the requested status.
    #[error("No transition found for status '{status}' on {issue}")]
    NoTransition { issue: IssueKey, status: String },

    /// A 2xx response whose body does not have the expected shape.
    #[error("Unexpected Jira {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The request never produced a usable response (connect, timeout, decode).
    #[error("Jira request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl JiraApiError {
    /// Returns the HTTP status code, if the tracker answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            JiraApiError::Api { status, .. } => Some(*status),
            JiraApiError::NoTransition { .. } | JiraApiError::Decode { .. } => None,
            JiraApiError::Transport(err) => err.status().map(|s| s.as_u16()),
        }
    }

    /// Builds an `Api` error from a status and raw response text.
    pub(crate) fn from_body(status: u16, text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        JiraApiError::Api { status, body }
    }
}
