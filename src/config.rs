//! Process configuration.
//!
//! All settings are read once at startup from command-line flags or the
//! environment (a `.env` file is loaded first by the binary, if present) and
//! are immutable for the lifetime of the process. Nothing else in the crate
//! reads the environment; components receive what they need through
//! [`AppState`](crate::server::AppState).

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::jira::JiraConfig;
use crate::server::BridgeSettings;
use crate::types::ProjectKey;

/// Errors from validating a loaded [`Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is missing or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// The tracker base URL is not an http(s) URL.
    #[error("JIRA_BASE_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    /// The request timeout is zero.
    #[error("REQUEST_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

/// Bridge configuration.
#[derive(Clone, Parser)]
#[command(name = "teams-jira-bridge", version, about)]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Base URL of the Jira site, e.g. https://example.atlassian.net.
    #[arg(long, env = "JIRA_BASE_URL", default_value = "")]
    pub jira_base_url: String,

    /// Jira account used for API calls.
    #[arg(long, env = "JIRA_USER", default_value = "")]
    pub jira_user: String,

    /// API token for `jira_user`.
    #[arg(long, env = "JIRA_TOKEN", default_value = "", hide_env_values = true)]
    pub jira_token: String,

    /// Project used by `my updates since ...` when no project is named.
    #[arg(long, env = "JIRA_PROJECT_KEY")]
    pub jira_project_key: Option<String>,

    /// Shared secret for POST /webhook/jira. Empty rejects every request.
    #[arg(long, env = "JIRA_SECRET", default_value = "", hide_env_values = true)]
    pub jira_secret: String,

    /// Shared secret for POST /webhook/teams. Empty rejects every request.
    #[arg(long, env = "TEAMS_SECRET", default_value = "", hide_env_values = true)]
    pub teams_secret: String,

    /// Incoming-webhook URL of the chat channel that receives acknowledgements.
    #[arg(long, env = "TEAMS_WEBHOOK_URL", hide_env_values = true)]
    pub teams_webhook_url: Option<String>,

    /// Display name of the bot, stripped from the start of chat messages.
    #[arg(long, env = "BOT_NAME", default_value = "JT-Agent")]
    pub bot_name: String,

    /// Timeout in seconds for each outbound HTTP request.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Config {
    /// Checks that the settings needed to reach the tracker are present.
    ///
    /// Empty webhook secrets are allowed: the corresponding endpoint then
    /// rejects every request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jira_base_url.trim().is_empty() {
            return Err(ConfigError::Missing("JIRA_BASE_URL"));
        }
        if !(self.jira_base_url.starts_with("http://") || self.jira_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidBaseUrl(self.jira_base_url.clone()));
        }
        if self.jira_user.trim().is_empty() {
            return Err(ConfigError::Missing("JIRA_USER"));
        }
        if self.jira_token.is_empty() {
            return Err(ConfigError::Missing("JIRA_TOKEN"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Address to bind on all interfaces.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The default project key, if one is configured and non-empty.
    pub fn default_project(&self) -> Option<ProjectKey> {
        non_empty(self.jira_project_key.as_deref()).map(ProjectKey::new)
    }

    /// The outbound chat webhook URL, if one is configured and non-empty.
    pub fn chat_webhook_url(&self) -> Option<String> {
        non_empty(self.teams_webhook_url.as_deref()).map(str::to_string)
    }

    pub fn jira_config(&self) -> JiraConfig {
        JiraConfig {
            base_url: self.jira_base_url.trim().to_string(),
            user: self.jira_user.trim().to_string(),
            token: self.jira_token.clone(),
            timeout: self.request_timeout(),
        }
    }

    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings {
            jira_secret: self.jira_secret.clone(),
            teams_secret: self.teams_secret.clone(),
            bot_name: self.bot_name.clone(),
            default_project: self.default_project(),
        }
    }
}

/// Redacts credentials and secrets.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("jira_base_url", &self.jira_base_url)
            .field("jira_user", &self.jira_user)
            .field("jira_project_key", &self.jira_project_key)
            .field("jira_secret_set", &!self.jira_secret.is_empty())
            .field("teams_secret_set", &!self.teams_secret.is_empty())
            .field("teams_webhook_set", &self.chat_webhook_url().is_some())
            .field("bot_name", &self.bot_name)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["teams-jira-bridge"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    fn complete() -> Config {
        parse(&[
            "--port",
            "8080",
            "--jira-base-url",
            "https://example.atlassian.net",
            "--jira-user",
            "bot@example.com",
            "--jira-token",
            "tok",
            "--jira-secret",
            "js",
            "--teams-secret",
            "ts",
            "--bot-name",
            "JT-Agent",
            "--request-timeout-secs",
            "10",
        ])
    }

    #[test]
    fn complete_config_validates() {
        let config = complete();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.listen_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let mut config = complete();
        config.jira_base_url = String::new();
        assert_eq!(config.validate(), Err(ConfigError::Missing("JIRA_BASE_URL")));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = complete();
        config.jira_base_url = "example.atlassian.net".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let mut config = complete();
        config.jira_token = String::new();
        assert_eq!(config.validate(), Err(ConfigError::Missing("JIRA_TOKEN")));

        let mut config = complete();
        config.jira_user = "  ".into();
        assert_eq!(config.validate(), Err(ConfigError::Missing("JIRA_USER")));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = complete();
        config.request_timeout_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn empty_optionals_are_none() {
        let mut config = complete();
        config.jira_project_key = Some("  ".into());
        config.teams_webhook_url = Some(String::new());
        assert_eq!(config.default_project(), None);
        assert_eq!(config.chat_webhook_url(), None);

        config.jira_project_key = Some("OPS".into());
        assert_eq!(config.default_project(), Some(ProjectKey::new("OPS")));
    }

    #[test]
    fn bridge_settings_carry_secrets() {
        let settings = complete().bridge_settings();
        assert_eq!(settings.jira_secret, "js");
        assert_eq!(settings.teams_secret, "ts");
        assert_eq!(settings.bot_name, "JT-Agent");
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("tok"));
        assert!(!rendered.contains("\"js\""));
        assert!(!rendered.contains("\"ts\""));
    }
}
