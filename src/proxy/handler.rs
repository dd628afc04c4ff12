//! HTTP handlers for the ADK proxy
//!
//! Provides 3 endpoints:
//! - POST /api/adk/create_session - create a session on the remote agent
//! - POST /api/adk/run_sse        - run one agent turn (buffered SSE)
//! - POST /api/adk/send_message   - alias of run_sse
//!
//! Every response, including failures, is a `{success, ...}` envelope.

use crate::agent::{
    parse_agent_sse_body, AgentBackend, MessageEnvelope, RemoteReply, SessionEnvelope,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Shared state for proxy handlers
#[derive(Clone)]
pub struct ProxyState {
    pub backend: Arc<AgentBackend>,
}

impl ProxyState {
    pub fn new(backend: AgentBackend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }
}

/// Body of the create-session route.
///
/// Only the routing fields are typed; the customer state is handed to the
/// agent untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRequest {
    user_id: String,
    session_id: String,
    #[serde(default)]
    state: Option<Value>,
}

/// Create the proxy router
pub fn proxy_router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/adk/create_session", post(create_session))
        .route("/api/adk/run_sse", post(run_message))
        .route("/api/adk/send_message", post(run_message))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/adk/create_session
async fn create_session(
    State(state): State<ProxyState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return internal_error(rejection.body_text(), SessionEnvelope::err),
    };

    tracing::info!(
        user_id = %request.user_id,
        session_id = %request.session_id,
        "Create session requested"
    );

    match state
        .backend
        .create_session(&request.user_id, &request.session_id, request.state.as_ref())
        .await
    {
        Ok(reply) => {
            let (status, envelope) = session_outcome(&reply);
            (status, Json(envelope))
        }
        Err(e) => {
            tracing::error!(error = %e, "Proxy create_session error");
            internal_error(e.detail(), SessionEnvelope::err)
        }
    }
}

/// POST /api/adk/run_sse and /api/adk/send_message
async fn run_message(
    State(state): State<ProxyState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let message = match payload {
        Ok(Json(message)) => message,
        Err(rejection) => return internal_error(rejection.body_text(), MessageEnvelope::err),
    };

    log_parts(&message);

    match state.backend.run(&message).await {
        Ok(reply) => {
            let (status, envelope) = message_outcome(&reply);
            (status, Json(envelope))
        }
        Err(e) => {
            tracing::error!(error = %e, "Proxy run_sse error");
            internal_error(e.detail(), MessageEnvelope::err)
        }
    }
}

// =============================================================================
// Response normalization
// =============================================================================

/// Map a remote create-session reply to the client envelope
pub fn session_outcome(reply: &RemoteReply) -> (StatusCode, SessionEnvelope) {
    let parsed: Option<Value> = serde_json::from_str(&reply.body).ok();

    if reply.is_success() {
        return match parsed
            .as_ref()
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str)
        {
            Some(id) => (StatusCode::OK, SessionEnvelope::ok(id)),
            None if parsed.is_some() => {
                tracing::warn!(body = %reply.body, "Agent session reply has no id");
                (StatusCode::OK, SessionEnvelope::without_id())
            }
            None => {
                tracing::error!(body = %reply.body, "Agent session reply is not JSON");
                internal_error_parts(
                    format!("Unreadable agent session reply: {}", reply.body),
                    SessionEnvelope::err,
                )
            }
        };
    }

    tracing::error!(status = reply.status, body = %reply.body, "ADK session API error");

    let error = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("ADK Error: {} - {}", reply.status, reply.body));

    (remote_status(reply.status), SessionEnvelope::err(error))
}

/// Map a remote run reply to the client envelope
pub fn message_outcome(reply: &RemoteReply) -> (StatusCode, MessageEnvelope) {
    if !reply.is_success() {
        tracing::error!(status = reply.status, body = %reply.body, "ADK run API error");
        return (
            remote_status(reply.status),
            MessageEnvelope::err(format!("ADK Error: {} - {}", reply.status, reply.body)),
        );
    }

    let content = parse_agent_sse_body(&reply.body).into_content();
    tracing::debug!(role = %content.role, parts = content.parts.len(), "Agent turn built");

    (StatusCode::OK, MessageEnvelope::ok(content))
}

// =============================================================================
// Helpers
// =============================================================================

fn log_parts(message: &Value) {
    let Some(parts) = message
        .get("new_message")
        .and_then(|m| m.get("parts"))
        .and_then(Value::as_array)
    else {
        return;
    };

    for (index, part) in parts.iter().enumerate() {
        if let Some(data) = part.get("inline_data") {
            tracing::debug!(
                index,
                mime_type = ?data.get("mime_type").and_then(serde_json::Value::as_str),
                size = data.get("data").and_then(serde_json::Value::as_str).map_or(0, str::len),
                "Outgoing image part"
            );
        } else if let Some(text) = part.get("text").and_then(Value::as_str) {
            tracing::debug!(index, text = %text, "Outgoing text part");
        } else {
            tracing::debug!(index, part = %part, "Outgoing part");
        }
    }
}

fn remote_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

fn internal_error_parts<E>(
    message: impl std::fmt::Display,
    envelope: impl FnOnce(String) -> E,
) -> (StatusCode, E) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        envelope(format!("Network or internal error: {}", message)),
    )
}

fn internal_error<E>(
    message: impl std::fmt::Display,
    envelope: impl FnOnce(String) -> E,
) -> (StatusCode, Json<E>) {
    let (status, body) = internal_error_parts(message, envelope);
    (status, Json(body))
}
