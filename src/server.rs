//! Proxy server: builds the application and serves it

use crate::agent::AgentBackend;
use crate::api::build_app;
use crate::config::ProxyConfig;
use crate::error::{Error, Result};
use crate::proxy::ProxyState;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// ADK proxy server
pub struct ProxyServer {
    config: ProxyConfig,
    state: ProxyState,
}

impl ProxyServer {
    /// Create a new server with the given configuration
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let backend = AgentBackend::new(&config.agent)?;
        Ok(Self {
            config,
            state: ProxyState::new(backend),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Build the HTTP application
    pub fn router(&self) -> Router {
        build_app(self.state.clone(), &self.config.server.cors_origins)
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind {}: {}", addr, e)))
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_on<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!(
            addr = %addr,
            agent = %self.config.agent.base_url,
            app = %self.config.agent.app_name,
            "ADK proxy listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("ADK proxy stopped");
        Ok(())
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn serve<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve_on(listener, shutdown).await
    }
}

/// Builder for [`ProxyServer`]
pub struct ProxyServerBuilder {
    config: ProxyConfig,
}

impl ProxyServerBuilder {
    /// Create a new builder with default config
    pub fn new() -> Self {
        Self {
            config: ProxyConfig::default(),
        }
    }

    /// Set the configuration
    pub fn config(mut self, config: ProxyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the remote agent base URL
    pub fn agent_url(mut self, url: impl Into<String>) -> Self {
        self.config.agent.base_url = url.into();
        self
    }

    /// Build the server
    pub fn build(self) -> Result<ProxyServer> {
        ProxyServer::new(self.config)
    }
}

impl Default for ProxyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
