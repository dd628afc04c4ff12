//! Session/message client for the ADK proxy.
//!
//! `AdkClient` translates UI-level calls into the agent wire format and talks
//! to the proxy routes. Conversation state lives in an explicit [`Session`]
//! value handed to each call, so the client itself holds no mutable state.
//!
//! Every public operation returns an envelope; errors never escape as `Err`.

mod message;
mod session;
mod transport;

pub use message::{
    build_parts, encode_data_url, mime_type_for_path, parse_data_url, DEFAULT_MIME_TYPE,
};
pub use session::{generate_session_id, Session};
pub use transport::{HttpTransport, ProxyTransport, TransportReply};

use crate::agent::{
    CreateSessionRequest, CustomerData, CustomerState, MessageEnvelope, OutgoingMessage,
    SessionEnvelope,
};
use crate::config::{ClientConfig, DEFAULT_APP_NAME};
use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Proxy route for session creation
pub const CREATE_SESSION_PATH: &str = "/api/adk/create_session";

/// Proxy route for running a turn
pub const RUN_SSE_PATH: &str = "/api/adk/run_sse";

/// Error returned when a send has neither text nor image
pub const EMPTY_MESSAGE_ERROR: &str = "Message is empty";

/// Client for the ADK proxy
#[derive(Debug, Clone)]
pub struct AdkClient<T = HttpTransport> {
    transport: T,
    app_name: String,
}

impl AdkClient<HttpTransport> {
    /// Create a client pointing at the proxy base URL
    pub fn new(proxy_url: &str) -> Self {
        Self::with_transport(HttpTransport::new(proxy_url))
    }

    /// Create a client from client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.proxy_url).app_name(config.app_name.clone())
    }
}

impl<T: ProxyTransport> AdkClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    /// Set the agent application name placed in outgoing messages
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create the session on the agent, or return the cached id.
    pub async fn create_session(
        &self,
        session: &mut Session,
        customer: CustomerData,
    ) -> SessionEnvelope {
        if session.is_initialized() {
            if let Some(id) = session.session_id() {
                tracing::debug!(session_id = %id, "Session already exists, reusing");
                return SessionEnvelope::ok(id);
            }
        }

        let local_id = session.begin();
        let request = CreateSessionRequest {
            user_id: session.user_id().to_string(),
            session_id: local_id.clone(),
            state: CustomerState::from_partial(session.user_id(), customer),
        };

        tracing::info!(user_id = %request.user_id, session_id = %local_id, "Creating session");

        match self
            .post::<_, SessionEnvelope>(CREATE_SESSION_PATH, &request)
            .await
        {
            Ok((reply, envelope)) if reply.is_success() && envelope.success => {
                let id = envelope.session_id.unwrap_or(local_id);
                session.mark_initialized(id.clone());
                SessionEnvelope::ok(id)
            }
            Ok((reply, envelope)) => {
                let error = envelope.error.unwrap_or_else(|| format!("HTTP {}", reply.status));
                tracing::error!(status = reply.status, error = %error, "Error creating session via proxy");
                SessionEnvelope::err(error)
            }
            Err(e) => {
                tracing::error!(error = %e, "Network error during session creation");
                SessionEnvelope::err(network_error(&e))
            }
        }
    }

    /// Send text and/or an image data URL, creating the session first if needed.
    pub async fn send_message(
        &self,
        session: &mut Session,
        text: &str,
        image: Option<&str>,
    ) -> MessageEnvelope {
        let parts = build_parts(text, image);
        if parts.is_empty() {
            return MessageEnvelope::err(EMPTY_MESSAGE_ERROR);
        }

        if !session.is_initialized() {
            tracing::debug!("Session not initialized, creating one");
            let created = self.create_session(session, CustomerData::default()).await;
            if !created.success {
                return MessageEnvelope {
                    success: false,
                    response: None,
                    error: created.error,
                };
            }
        }

        let Some(session_id) = session.session_id() else {
            return MessageEnvelope::err("Session has no id");
        };
        let message = OutgoingMessage::user(&self.app_name, session.user_id(), session_id, parts);

        match self.post::<_, MessageEnvelope>(RUN_SSE_PATH, &message).await {
            Ok((reply, envelope))
                if reply.is_success() && envelope.success && envelope.response.is_some() =>
            {
                envelope
            }
            Ok((reply, envelope)) => {
                let error = envelope.error.unwrap_or_else(|| format!("HTTP {}", reply.status));
                tracing::error!(status = reply.status, error = %error, "Error sending message via proxy");
                MessageEnvelope::err(error)
            }
            Err(e) => {
                tracing::error!(error = %e, "Network error sending message");
                MessageEnvelope::err(network_error(&e))
            }
        }
    }

    /// Reset a session to its initial state (no network call)
    pub fn reset_session(&self, session: &mut Session) {
        session.reset();
    }

    /// Current id of a session
    pub fn current_session_id<'a>(&self, session: &'a Session) -> Option<&'a str> {
        session.session_id()
    }

    /// POST a body and decode the reply as an envelope of type `E`
    async fn post<B, E>(&self, path: &str, body: &B) -> Result<(TransportReply, E)>
    where
        B: Serialize,
        E: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let reply = self.transport.post_json(path, &body).await?;
        let envelope = E::deserialize(&reply.body).map_err(|e| {
            Error::Client(format!("Unexpected response from {} ({}): {}", path, reply.status, e))
        })?;
        Ok((reply, envelope))
    }
}

fn network_error(error: &Error) -> String {
    format!("Network error: {}", error.detail())
}
