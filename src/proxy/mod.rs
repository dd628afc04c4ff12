//! Proxy routes between the client and the remote agent
//!
//! Stateless forwarding handlers: each request opens exactly one outbound
//! call to the agent, buffers the reply and answers with an envelope.

mod handler;

pub use handler::{message_outcome, proxy_router, session_outcome, ProxyState};
