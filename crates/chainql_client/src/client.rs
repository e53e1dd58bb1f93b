//! Client configuration and the connection entry point.

use crate::session::{BlockingHttpSession, HttpSession};
use chainql_core::{Root, TransportError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint URL of the remote API.
    pub url: String,
    /// Deadline applied to connect, write, and read of one request. An
    /// elapsed deadline surfaces from `execute` as the timeout error.
    pub timeout: Duration,
    /// Headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Creates a new config with a URL and a 30 second timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
            headers: HashMap::new(),
        }
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub(crate) fn header_list(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Connection entry point: binds the query root to an HTTP session. No
/// connection is opened until the first chain executes.
pub struct Client {
    config: ClientConfig,
}

impl Client {
    /// Creates a client for the given endpoint with default configuration.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(url),
        }
    }

    /// Creates a client with configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Binds the query root to an asynchronous HTTP session. The endpoint
    /// is validated here; the first dial happens when a chain executes.
    pub fn connect(&self) -> Result<Root, TransportError> {
        let session = HttpSession::new(self.config.clone())?;
        Ok(Root::from_session(Arc::new(session)))
    }

    /// Binds the query root to a blocking session, for callers without an
    /// async runtime.
    pub fn connect_blocking(&self) -> Result<Root, TransportError> {
        let session = BlockingHttpSession::new(self.config.clone())?;
        Ok(Root::from_sync_session(Arc::new(session)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_collects_settings() {
        let config = ClientConfig::new("http://localhost:8080/query")
            .timeout(Duration::from_secs(10))
            .header("Authorization", "Bearer token")
            .header("X-Request-Id", "42");

        assert_eq!(config.url, "http://localhost:8080/query");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.headers.get("Authorization"), Some(&"Bearer token".to_string()));
        assert_eq!(config.headers.get("X-Request-Id"), Some(&"42".to_string()));
    }

    #[test]
    fn roots_bind_lazily_without_dialing() {
        // Nothing listens on this port; binding the root must still work.
        let client = Client::new("http://localhost:59999/query");
        let root = client.connect().unwrap();
        assert_eq!(root.graphql_name(), "Query");
        assert!(client.connect_blocking().is_ok());
    }

    #[test]
    fn bad_endpoints_are_rejected_up_front() {
        let client = Client::new("https://localhost/query");
        assert!(client.connect().is_err());
        assert!(client.connect_blocking().is_err());
    }
}
