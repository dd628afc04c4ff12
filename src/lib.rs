//! ADK Proxy - session-aware bridge to a remote shopping assistant agent
//!
//! A user exchanges text and images with a remote conversational agent. This
//! crate provides the client that manages the conversation session and
//! assembles multi-part messages, and the HTTP proxy that forwards those
//! messages to the agent and normalizes its replies.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────┐        ┌──────────────┐
//! │  Presentation (CLI)  │        │        ADK Proxy         │        │ Remote Agent │
//! │  ┌────────────────┐  │  HTTP  │  /api/adk/create_session │  HTTP  │  /apps/...   │
//! │  │   AdkClient    │──┼───────▶│  /api/adk/run_sse        │───────▶│  /run_sse    │
//! │  │   + Session    │  │        │  /api/adk/send_message   │        │              │
//! │  └────────────────┘  │◀───────┼── {success, ...}         │◀───────┼── data: {..} │
//! └──────────────────────┘        └──────────────────────────┘        └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`agent`]: Wire types, SSE body parsing, remote agent backend
//! - [`proxy`]: Proxy route handlers
//! - [`api`]: HTTP application (routes, CORS, tracing)
//! - [`server`]: Server lifecycle
//! - [`client`]: Session/message client
//! - [`config`]: Configuration management

pub mod agent;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod server;

pub use client::{AdkClient, Session};
pub use config::ProxyConfig;
pub use error::{Error, Result};
pub use server::{ProxyServer, ProxyServerBuilder};
