//! Jira REST client.
//!
//! `JiraClient` wraps a `reqwest::Client` with the tracker's base URL and
//! Basic credentials. Each operation performs one HTTP call (two for
//! transitions) and resolves to a `Result` without retrying.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::types::{IssueKey, ProjectKey};

use super::error::JiraApiError;
use super::requests::{
    NewIssue, TransitionList, assignee_body, comment_body, create_issue_body, do_transition_body,
    updates_jql,
};

/// A successful tracker call.
#[derive(Debug, Clone, PartialEq)]
pub enum JiraResponse {
    /// The decoded response body.
    Payload(Value),
    /// The HTTP status of a call whose response carries no useful body.
    Status(u16),
}

/// Connection settings for [`JiraClient`].
#[derive(Clone)]
pub struct JiraConfig {
    /// Base URL of the Jira site, e.g. `https://example.atlassian.net`.
    pub base_url: String,
    pub user: String,
    pub token: String,
    /// Upper bound for each outbound request.
    pub timeout: Duration,
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A Jira API client authenticated with a user and API token.
#[derive(Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    token: String,
}

impl JiraClient {
    /// Builds a client for the given site.
    pub fn new(config: JiraConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user: config.user,
            token: config.token,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an issue. Returns the created issue's payload (`id`, `key`, `self`).
    pub async fn create_issue(&self, issue: &NewIssue) -> Result<JiraResponse, JiraApiError> {
        self.create_issue_on(issue, Utc::now().date_naive()).await
    }

    /// Creates an issue as if today were `today`; the due date derives from it.
    pub async fn create_issue_on(
        &self,
        issue: &NewIssue,
        today: NaiveDate,
    ) -> Result<JiraResponse, JiraApiError> {
        debug!(project = %issue.project, summary = %issue.summary, "Creating issue");
        let request = self
            .request(Method::POST, "/rest/api/3/issue")
            .json(&create_issue_body(issue, today));
        let result = send_json(request).await.map(JiraResponse::Payload);
        record("create_issue", issue.project.as_str(), &result);
        result
    }

    /// Sets an issue's assignee. Returns the HTTP status.
    pub async fn assign_issue(
        &self,
        issue: &IssueKey,
        assignee: &str,
    ) -> Result<JiraResponse, JiraApiError> {
        debug!(issue = %issue, assignee, "Assigning issue");
        let request = self
            .request(Method::PUT, &format!("/rest/api/3/issue/{}/assignee", issue))
            .json(&assignee_body(assignee));
        let result = send_status(request).await.map(JiraResponse::Status);
        record("assign_issue", issue.as_str(), &result);
        result
    }

    /// Moves an issue through the transition named `status` (case-insensitive).
    ///
    /// Looks up the available transitions first; if none matches, fails with
    /// [`JiraApiError::NoTransition`] without attempting the transition.
    pub async fn transition_issue(
        &self,
        issue: &IssueKey,
        status: &str,
    ) -> Result<JiraResponse, JiraApiError> {
        debug!(issue = %issue, status, "Transitioning issue");
        let result = self.resolve_and_transition(issue, status).await;
        record("transition_issue", issue.as_str(), &result);
        result
    }

    async fn resolve_and_transition(
        &self,
        issue: &IssueKey,
        status: &str,
    ) -> Result<JiraResponse, JiraApiError> {
        let path = format!("/rest/api/3/issue/{}/transitions", issue);

        let listing = send_json(self.request(Method::GET, &path)).await?;
        let transitions: TransitionList =
            serde_json::from_value(listing).map_err(|source| JiraApiError::Decode {
                what: "transition list",
                source,
            })?;
        let transition =
            transitions
                .find(status)
                .ok_or_else(|| JiraApiError::NoTransition {
                    issue: issue.clone(),
                    status: status.to_string(),
                })?;

        debug!(issue = %issue, transition_id = %transition.id, "Resolved transition");
        let request = self
            .request(Method::POST, &path)
            .json(&do_transition_body(&transition.id));
        send_status(request).await.map(JiraResponse::Status)
    }

    /// Adds a comment to an issue. Returns the created comment's payload.
    pub async fn comment_on_issue(
        &self,
        issue: &IssueKey,
        text: &str,
    ) -> Result<JiraResponse, JiraApiError> {
        debug!(issue = %issue, "Commenting on issue");
        let request = self
            .request(Method::POST, &format!("/rest/api/3/issue/{}/comment", issue))
            .json(&comment_body(text));
        let result = send_json(request).await.map(JiraResponse::Payload);
        record("comment_on_issue", issue.as_str(), &result);
        result
    }

    /// Searches for issues in `project` updated since `since`, assigned to
    /// `user` or, when absent, to the authenticated account.
    pub async fn query_updates(
        &self,
        project: &ProjectKey,
        since: &str,
        user: Option<&str>,
    ) -> Result<JiraResponse, JiraApiError> {
        let jql = updates_jql(project, since, user);
        debug!(project = %project, jql = %jql, "Querying updates");
        let request = self
            .request(Method::GET, "/rest/api/3/search")
            .query(&[("jql", jql.as_str())]);
        let result = send_json(request).await.map(JiraResponse::Payload);
        record("query_updates", project.as_str(), &result);
        result
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .basic_auth(&self.user, Some(&self.token))
    }
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Sends a request and decodes a JSON body from a 2xx response.
async fn send_json(request: RequestBuilder) -> Result<Value, JiraApiError> {
    let response = check_status(request.send().await?).await?;
    Ok(response.json().await?)
}

/// Sends a request and returns the status of a 2xx response, ignoring its body.
async fn send_status(request: RequestBuilder) -> Result<u16, JiraApiError> {
    let response = check_status(request.send().await?).await?;
    Ok(response.status().as_u16())
}

/// Converts non-2xx responses into [`JiraApiError::Api`] carrying the error body.
async fn check_status(response: Response) -> Result<Response, JiraApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(JiraApiError::from_body(status.as_u16(), &text))
}

fn record(operation: &'static str, subject: &str, result: &Result<JiraResponse, JiraApiError>) {
    match result {
        Ok(JiraResponse::Status(status)) => {
            info!(operation, subject, status = *status, "Jira call succeeded");
        }
        Ok(JiraResponse::Payload(payload)) => {
            info!(operation, subject, response = %payload, "Jira call succeeded");
        }
        Err(e) => {
            warn!(operation, subject, error = %e, "Jira call failed");
        }
    }
}
