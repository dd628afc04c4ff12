//! Unified API router for the ADK proxy
//!
//! Merges the proxy routes with a health probe, CORS and request tracing.
//!
//! ## Endpoint Map
//!
//! | Path                       | Description                         |
//! |----------------------------|-------------------------------------|
//! | `/health`                  | Health probe                        |
//! | `/api/adk/create_session`  | Create a session on the agent       |
//! | `/api/adk/run_sse`         | Run one agent turn                  |
//! | `/api/adk/send_message`    | Alias of `run_sse`                  |

use crate::proxy::{proxy_router, ProxyState};
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete HTTP application
///
/// Returns a single `Router` ready to be served by `axum::serve`.
pub fn build_app(proxy_state: ProxyState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(proxy_router(proxy_state))
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
