//! ADK proxy configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides the remote agent base URL
pub const AGENT_BASE_URL_ENV: &str = "ADK_BASE_URL";

/// Remote agent used when neither config nor environment names one
pub const DEFAULT_AGENT_BASE_URL: &str =
    "https://adk-default-service-name-670631922839.europe-west1.run.app";

/// Agent application every session and message is addressed to
pub const DEFAULT_APP_NAME: &str = "chair_agent";

/// Main proxy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote agent configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Client configuration (used by the `chat` command)
    #[serde(default)]
    pub client: ClientConfig,
}

impl ProxyConfig {
    /// Load configuration from an optional TOML file, then apply the
    /// `ADK_BASE_URL` environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_agent_base_url(std::env::var(AGENT_BASE_URL_ENV).ok()))
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Override the agent base URL when a non-empty value is given
    pub fn with_agent_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.agent.base_url = url;
        }
        self
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

/// Remote agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the remote agent service
    pub base_url: String,

    /// Agent application name
    pub app_name: String,

    /// Request timeout in seconds (None = wait indefinitely)
    pub timeout_secs: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AGENT_BASE_URL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout_secs: None,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the proxy the client talks to
    pub proxy_url: String,

    /// User identifier sent with every session and message
    pub user_id: String,

    /// Agent application name placed in outgoing messages
    pub app_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:3000".to_string(),
            user_id: "user_123".to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}
