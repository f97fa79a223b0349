//! HTTP server for the bridge.
//!
//! This module implements the HTTP server that:
//! - Accepts chat webhooks, parses commands and runs them against the tracker
//! - Accepts tracker webhooks and logs them
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /webhook/teams` - Chat commands (returns 200 with the recognized action)
//! - `POST /webhook/jira` - Tracker events (returns 200 `Received`)
//! - `GET /health` - Returns 200 if server is running
//! - `GET /` - Landing page

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::jira::JiraClient;
use crate::teams::TeamsNotifier;
use crate::types::ProjectKey;

pub mod health;
pub mod teams;
pub mod webhook;

pub use health::{health_handler, index_handler};
pub use teams::teams_webhook_handler;
pub use webhook::{WebhookError, jira_webhook_handler};

/// Webhook-side settings, separate from the clients they configure.
#[derive(Clone, Default)]
pub struct BridgeSettings {
    /// Secret for `POST /webhook/jira`; empty rejects every request.
    pub jira_secret: String,
    /// Secret for `POST /webhook/teams`; empty rejects every request.
    pub teams_secret: String,
    /// Bot display name stripped from the start of chat messages.
    pub bot_name: String,
    /// Project for `my updates since ...` without `in <PROJECT>`.
    pub default_project: Option<ProjectKey>,
}

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. It is built
/// once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    jira: JiraClient,
    notifier: TeamsNotifier,
    settings: BridgeSettings,
}

impl AppState {
    /// Creates a new `AppState` from its clients and settings.
    pub fn new(jira: JiraClient, notifier: TeamsNotifier, settings: BridgeSettings) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                jira,
                notifier,
                settings,
            }),
        }
    }

    /// Returns the tracker client.
    pub fn jira(&self) -> &JiraClient {
        &self.inner.jira
    }

    /// Returns the chat notifier.
    pub fn notifier(&self) -> &TeamsNotifier {
        &self.inner.notifier
    }

    pub fn jira_secret(&self) -> &str {
        &self.inner.settings.jira_secret
    }

    pub fn teams_secret(&self) -> &str {
        &self.inner.settings.teams_secret
    }

    pub fn bot_name(&self) -> &str {
        &self.inner.settings.bot_name
    }

    pub fn default_project(&self) -> Option<&ProjectKey> {
        self.inner.settings.default_project.as_ref()
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/webhook/jira", post(jira_webhook_handler))
        .route("/webhook/teams", post(teams_webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
