//! Buffered SSE body parsing for `run_sse` replies.
//!
//! The agent answers a run request with a `text/event-stream` body. The proxy
//! does not relay it incrementally: the whole body is read, and the last
//! `data: ` line carrying a payload is taken as the definitive agent turn.

use super::types::{AgentContent, MessagePart};
use serde_json::Value;

const DATA_PREFIX: &str = "data: ";

/// Outcome of parsing a buffered SSE body
#[derive(Debug, Clone, PartialEq)]
pub enum AgentTurn {
    /// The last data line held valid JSON
    Parsed(Value),
    /// No data line with a payload was present
    NoData,
    /// The last data line was not valid JSON (raw payload kept)
    Malformed(String),
}

impl AgentTurn {
    /// Extract the agent's content, falling back to the canned reply.
    ///
    /// Only text is carried over; non-text parts become empty text parts.
    pub fn into_content(self) -> AgentContent {
        let content = match self {
            Self::Parsed(payload) => match payload.get("content") {
                Some(content) if !content.is_null() => content.clone(),
                _ => return AgentContent::fallback(),
            },
            Self::NoData | Self::Malformed(_) => return AgentContent::fallback(),
        };

        let role = content
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or("model")
            .to_string();

        let parts = content
            .get("parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .map(|part| {
                        MessagePart::text(part.get("text").and_then(Value::as_str).unwrap_or(""))
                    })
                    .collect()
            })
            .unwrap_or_default();

        AgentContent { role, parts }
    }
}

/// Parse a complete SSE body into the final agent turn.
pub fn parse_agent_sse_body(body: &str) -> AgentTurn {
    let last = body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .rfind(|payload| !payload.trim().is_empty());

    let Some(payload) = last else {
        return AgentTurn::NoData;
    };

    match serde_json::from_str(payload) {
        Ok(value) => AgentTurn::Parsed(value),
        Err(e) => {
            tracing::warn!(error = %e, payload, "Failed to parse SSE data line");
            AgentTurn::Malformed(payload.to_string())
        }
    }
}
