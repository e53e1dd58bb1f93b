//! HTTP sessions implementing the core's session traits.

use crate::client::ClientConfig;
use crate::http::{post_request, response_body, Endpoint};
use async_trait::async_trait;
use chainql_core::{Document, Session, SyncSession, TransportError};
use serde::Deserialize;
use std::io::{Read, Write};
use std::net::ToSocketAddrs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::debug;

/// The GraphQL-over-HTTP response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

/// Decodes an envelope body. A non-empty `errors` value means the server
/// executed the request and reported failures; the payload is handed back
/// raw for the core to interpret.
fn decode_envelope(body: &str) -> Result<serde_json::Value, TransportError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| TransportError::InvalidResponse(format!("malformed envelope: {e}")))?;
    if let Some(errors) = envelope.errors {
        let empty = errors.is_null() || errors.as_array().is_some_and(Vec::is_empty);
        if !empty {
            return Err(TransportError::Query { errors });
        }
    }
    Ok(envelope.data.unwrap_or(serde_json::Value::Null))
}

fn request_body(document: &Document) -> String {
    serde_json::json!({ "query": document.as_str() }).to_string()
}

/// Asynchronous HTTP session over a tokio TCP stream. One connection per
/// document; the configured timeout covers connect, write, and read
/// separately.
pub struct HttpSession {
    config: ClientConfig,
    endpoint: Endpoint,
}

impl HttpSession {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let endpoint = Endpoint::parse(&config.url)?;
        Ok(Self { config, endpoint })
    }

    async fn post(&self, body: &str) -> Result<String, TransportError> {
        let request = post_request(&self.endpoint, &self.config.header_list(), body);

        let connect = tokio::net::TcpStream::connect(self.endpoint.authority());
        let mut stream = timeout(self.config.timeout, connect)
            .await
            .map_err(|_| TransportError::Timeout)?
            .map_err(|e| TransportError::Network(format!("connect failed: {e}")))?;

        timeout(self.config.timeout, stream.write_all(request.as_bytes()))
            .await
            .map_err(|_| TransportError::Timeout)?
            .map_err(|e| TransportError::Network(format!("write failed: {e}")))?;

        let mut raw = Vec::new();
        timeout(self.config.timeout, stream.read_to_end(&mut raw))
            .await
            .map_err(|_| TransportError::Timeout)?
            .map_err(|e| TransportError::Network(format!("read failed: {e}")))?;

        response_body(&raw)
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn execute(&self, document: &Document) -> Result<serde_json::Value, TransportError> {
        debug!(endpoint = %self.endpoint.authority(), "submitting document");
        let body = self.post(&request_body(document)).await?;
        decode_envelope(&body)
    }
}

/// Blocking HTTP session over a std TCP stream, for callers without an
/// async runtime. Chains bound to one resolve references sequentially.
pub struct BlockingHttpSession {
    config: ClientConfig,
    endpoint: Endpoint,
}

impl BlockingHttpSession {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let endpoint = Endpoint::parse(&config.url)?;
        Ok(Self { config, endpoint })
    }

    fn post(&self, body: &str) -> Result<String, TransportError> {
        let request = post_request(&self.endpoint, &self.config.header_list(), body);

        let addr = (self.endpoint.host.as_str(), self.endpoint.port)
            .to_socket_addrs()
            .map_err(|e| TransportError::Network(format!("address lookup failed: {e}")))?
            .next()
            .ok_or_else(|| TransportError::Network("address lookup returned nothing".into()))?;

        let mut stream = std::net::TcpStream::connect_timeout(&addr, self.config.timeout)
            .map_err(map_io_error)?;
        stream
            .set_write_timeout(Some(self.config.timeout))
            .map_err(map_io_error)?;
        stream
            .set_read_timeout(Some(self.config.timeout))
            .map_err(map_io_error)?;

        stream.write_all(request.as_bytes()).map_err(map_io_error)?;
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).map_err(map_io_error)?;

        response_body(&raw)
    }
}

impl SyncSession for BlockingHttpSession {
    fn execute(&self, document: &Document) -> Result<serde_json::Value, TransportError> {
        debug!(endpoint = %self.endpoint.authority(), "submitting document");
        let body = self.post(&request_body(document))?;
        decode_envelope(&body)
    }
}

fn map_io_error(e: std::io::Error) -> TransportError {
    match e.kind() {
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => TransportError::Timeout,
        _ => TransportError::Network(e.to_string()),
    }
}
