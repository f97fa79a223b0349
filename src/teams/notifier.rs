//! Incoming-webhook client for the chat channel.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Text posted back to the channel for every command received.
pub const ACKNOWLEDGEMENT: &str = "Got it! Your request was received and is being processed.";

/// Errors from posting to the chat webhook.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No outbound webhook URL is configured.
    #[error("no chat webhook URL configured")]
    NotConfigured,

    /// The request could not be completed.
    #[error("chat webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered with a non-2xx status.
    #[error("chat webhook rejected message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct MessageCard<'a> {
    text: &'a str,
}

/// Posts plain-text messages to a chat channel's incoming webhook.
#[derive(Debug, Clone)]
pub struct TeamsNotifier {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl TeamsNotifier {
    /// Creates a notifier. With `webhook_url` of `None` every post is skipped.
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, webhook_url })
    }

    /// Returns whether an outbound webhook URL is configured.
    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Posts `{"text": text}` to the webhook.
    pub async fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        let url = self.webhook_url.as_deref().ok_or(NotifyError::NotConfigured)?;
        let response = self
            .http
            .post(url)
            .json(&MessageCard { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Posts [`ACKNOWLEDGEMENT`] on a detached task.
    ///
    /// The returned handle may be dropped; the task's outcome is only logged.
    /// Returns `None` when no webhook URL is configured.
    pub fn spawn_acknowledgement(&self) -> Option<JoinHandle<()>> {
        if !self.is_configured() {
            debug!("No chat webhook configured; skipping acknowledgement");
            return None;
        }
        let notifier = self.clone();
        Some(tokio::spawn(async move {
            match notifier.post_message(ACKNOWLEDGEMENT).await {
                Ok(()) => info!("Posted acknowledgement to chat"),
                Err(e) => warn!(error = %e, "Failed to post acknowledgement to chat"),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier(url: Option<String>) -> TeamsNotifier {
        TeamsNotifier::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn posts_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(json!({"text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("1"))
            .expect(1)
            .mount(&server)
            .await;

        notifier(Some(format!("{}/hook", server.uri())))
            .post_message("hello")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_post_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad card"))
            .mount(&server)
            .await;

        let err = notifier(Some(server.uri()))
            .post_message("hello")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NotifyError::Rejected { status: 400, ref body } if body == "bad card"
        ));
    }

    #[tokio::test]
    async fn unconfigured_notifier_skips() {
        let n = notifier(None);
        assert!(!n.is_configured());
        assert!(matches!(
            n.post_message("x").await,
            Err(NotifyError::NotConfigured)
        ));
        assert!(n.spawn_acknowledgement().is_none());
    }

    #[tokio::test]
    async fn acknowledgement_task_posts_fixed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"text": ACKNOWLEDGEMENT})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let handle = notifier(Some(server.uri())).spawn_acknowledgement().unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn acknowledgement_failure_does_not_panic() {
        let handle = notifier(Some("http://127.0.0.1:1".into()))
            .spawn_acknowledgement()
            .unwrap();
        assert!(handle.await.is_ok());
    }
}
