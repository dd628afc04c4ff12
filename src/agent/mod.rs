//! Remote agent integration
//!
//! Wire types, the buffered SSE parser and the HTTP backend used by the
//! proxy routes to reach the remote agent service.

pub mod remote;
pub mod sse;
pub mod types;

pub use remote::{AgentBackend, RemoteReply};
pub use sse::{parse_agent_sse_body, AgentTurn};
pub use types::{
    AgentContent, BasketItem, CreateSessionRequest, CustomerData, CustomerState, InlineData,
    MessageEnvelope, MessagePart, NewMessage, OutgoingMessage, Purchase, SessionEnvelope,
    FALLBACK_REPLY_TEXT,
};
