use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teams_jira_bridge::config::Config;
use teams_jira_bridge::jira::JiraClient;
use teams_jira_bridge::server::{AppState, build_router};
use teams_jira_bridge::teams::TeamsNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teams_jira_bridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    config.validate().context("invalid configuration")?;
    info!(config = ?config, "Loaded configuration");

    if config.jira_secret.is_empty() {
        warn!("JIRA_SECRET is empty; /webhook/jira will reject every request");
    }
    if config.teams_secret.is_empty() {
        warn!("TEAMS_SECRET is empty; /webhook/teams will reject every request");
    }

    let jira = JiraClient::new(config.jira_config()).context("failed to build Jira client")?;
    info!(jira = %jira.base_url(), "Jira client ready");
    let notifier = TeamsNotifier::new(config.chat_webhook_url(), config.request_timeout())
        .context("failed to build Teams notifier")?;
    if !notifier.is_configured() {
        warn!("TEAMS_WEBHOOK_URL is not set; acknowledgements are disabled");
    }

    let app = build_router(AppState::new(jira, notifier, config.bridge_settings()));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
