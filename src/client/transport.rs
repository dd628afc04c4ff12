//! Transport between the client and the proxy

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Status and decoded JSON body of a proxy response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    pub status: u16,
    pub body: Value,
}

impl TransportReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POSTs JSON to a proxy route and returns the decoded reply.
///
/// An `Err` means the exchange itself failed (connection, unreadable body);
/// non-2xx replies are returned as `Ok`.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportReply>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport pointing at the proxy base URL.
    ///
    /// Example: `HttpTransport::new("http://127.0.0.1:3000")`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ProxyTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportReply> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).map_err(|e| {
            Error::Client(format!("Unreadable response from {} ({}): {}", path, status, e))
        })?;
        Ok(TransportReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let transport = HttpTransport::new("http://localhost:3000/");
        assert_eq!(transport.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_reply_success() {
        let reply = |status| TransportReply {
            status,
            body: Value::Null,
        };
        assert!(reply(201).is_success());
        assert!(!reply(302).is_success());
        assert!(!reply(500).is_success());
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let result = transport.post_json("/api/adk/run_sse", &Value::Null).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
