//! HTTP client for the remote agent service

use crate::config::AgentConfig;
use crate::error::{Error, Result};
use reqwest::Url;
use serde_json::{Map, Value};
use std::time::Duration;

/// Raw reply from the remote agent: status code and buffered body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReply {
    pub status: u16,
    pub body: String,
}

impl RemoteReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Remote agent backend shared by the proxy routes
#[derive(Debug, Clone)]
pub struct AgentBackend {
    base_url: String,
    app_name: String,
    client: reqwest::Client,
}

impl AgentBackend {
    /// Create a backend from agent configuration
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_name: config.app_name.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// URL of the session resource for a user/session pair
    pub fn session_url(&self, user_id: &str, session_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid agent base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Agent base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["apps", self.app_name.as_str(), "users", user_id, "sessions", session_id]);
        Ok(url)
    }

    /// URL of the buffered run endpoint
    pub fn run_url(&self) -> String {
        format!("{}/run_sse", self.base_url)
    }

    /// POST `{state}` to the session resource.
    ///
    /// The state is opaque here and forwarded as received; a missing state
    /// is sent as an empty object.
    pub async fn create_session(
        &self,
        user_id: &str,
        session_id: &str,
        state: Option<&Value>,
    ) -> Result<RemoteReply> {
        let url = self.session_url(user_id, session_id)?;
        tracing::info!(%url, "Creating agent session");

        let mut payload = Map::new();
        if let Some(state) = state {
            payload.insert("state".to_string(), state.clone());
        }

        let response = self
            .client
            .post(url)
            .json(&Value::Object(payload))
            .send()
            .await?;

        Self::buffer(response).await
    }

    /// POST the message verbatim to `/run_sse` and buffer the event stream
    pub async fn run(&self, message: &Value) -> Result<RemoteReply> {
        let url = self.run_url();
        tracing::info!(
            %url,
            session_id = ?message.get("session_id").and_then(serde_json::Value::as_str),
            "Running agent turn"
        );

        let response = self.client.post(&url).json(message).send().await?;

        Self::buffer(response).await
    }

    async fn buffer(response: reqwest::Response) -> Result<RemoteReply> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, body = %body, "Agent reply");
        Ok(RemoteReply { status, body })
    }
}
