// Client configuration and origin resolution
// Feature: Unified HTTP Client (001-http-client)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default per-call timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Path prefixes routed to the user-domain origin instead of the agent
/// origin. Checked in order, case-sensitive, first match wins.
pub const USER_TARGET_PREFIXES: &[&str] = &["/wallet/", "/homepage", "/auth"];

const ENV_AGENT_URL: &str = "CLIPFLOW_API_AGENT_URL";
const ENV_USER_URL: &str = "CLIPFLOW_API_USER_URL";
const ENV_TIMEOUT_MS: &str = "CLIPFLOW_REQUEST_TIMEOUT_MS";
const ENV_AUTH_APP_ID: &str = "CLIPFLOW_AUTH_APP_ID";

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable missing
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    /// Origin URL failed to parse
    #[error("Invalid origin in {var}: {message}")]
    InvalidOrigin { var: &'static str, message: String },

    /// Timeout override was not a positive integer
    #[error("Invalid timeout in {0}: expected milliseconds")]
    InvalidTimeout(&'static str),
}

/// Deployment-time client configuration.
///
/// Two backend origins are consumed: the agent domain serves project and
/// workspace endpoints, the user domain serves wallet/homepage/auth paths.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin for agent-domain endpoints
    pub agent_origin: String,
    /// Origin for user-domain endpoints (wallet, homepage, auth)
    pub user_origin: String,
    /// Default per-call timeout
    pub request_timeout: Duration,
    /// Identity-provider application id, passed through to the auth SDK by
    /// the embedding application
    pub auth_app_id: Option<String>,
}

impl ClientConfig {
    pub fn new(agent_origin: impl Into<String>, user_origin: impl Into<String>) -> Self {
        Self {
            agent_origin: agent_origin.into(),
            user_origin: user_origin.into(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            auth_app_id: None,
        }
    }

    /// Load configuration from the environment (`.env` honored for local
    /// development).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let agent_origin = require_origin(ENV_AGENT_URL)?;
        let user_origin = require_origin(ENV_USER_URL)?;

        let request_timeout = match std::env::var(ENV_TIMEOUT_MS) {
            Ok(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(ENV_TIMEOUT_MS))?;
                if ms == 0 {
                    return Err(ConfigError::InvalidTimeout(ENV_TIMEOUT_MS));
                }
                Duration::from_millis(ms)
            }
            Err(_) => Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        };

        Ok(Self {
            agent_origin,
            user_origin,
            request_timeout,
            auth_app_id: std::env::var(ENV_AUTH_APP_ID).ok(),
        })
    }

    /// Resolve the full URL for a request path.
    ///
    /// Fully-qualified paths bypass origin resolution entirely; an explicit
    /// override is used verbatim; otherwise the prefix table picks between
    /// the user and agent origins.
    pub fn resolve_url(&self, path: &str, override_base: Option<&str>) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = match override_base {
            Some(base) => base,
            None if is_user_target_path(path) => &self.user_origin,
            None => &self.agent_origin,
        };

        format!("{}{}", base.trim_end_matches('/'), path)
    }
}

/// Whether a path belongs to the user-domain origin
pub fn is_user_target_path(path: &str) -> bool {
    USER_TARGET_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

fn require_origin(var: &'static str) -> Result<String, ConfigError> {
    let raw = std::env::var(var).map_err(|_| ConfigError::MissingVar(var))?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidOrigin {
        var,
        message: e.to_string(),
    })?;
    Ok(raw)
}
