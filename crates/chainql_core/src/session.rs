//! The session capability consumed by the executor.
//!
//! The core never talks to the network itself: it hands a finished
//! [`Document`] to whichever session the chain is bound to and interprets
//! the transport's failures. Session implementations live outside this
//! crate (`chainql_client` ships HTTP ones).

use crate::query::Document;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failures reported by a session's transport.
///
/// The executor interprets [`TransportError::Timeout`] and
/// [`TransportError::Query`]; every other variant propagates to the caller
/// unchanged.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// The configured deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// The server executed the request and reported errors. The payload is
    /// the machine-readable error list exactly as received.
    #[error("query failed on server: {errors}")]
    Query { errors: serde_json::Value },

    /// Connecting to or talking to the endpoint failed.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("http error: {0}")]
    Http(String),

    /// The endpoint's response could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// An asynchronous session able to submit one document per call.
#[async_trait]
pub trait Session: Send + Sync {
    /// Submits a document and returns the response `data` value.
    async fn execute(&self, document: &Document) -> Result<serde_json::Value, TransportError>;
}

/// A blocking session for callers without an async runtime. Reference
/// resolution on chains bound to one runs strictly sequentially.
pub trait SyncSession: Send + Sync {
    /// Submits a document and returns the response `data` value.
    fn execute(&self, document: &Document) -> Result<serde_json::Value, TransportError>;
}

/// The session a chain is bound to. The variant selects the execution mode:
/// concurrent reference resolution for async sessions, sequential for
/// blocking ones.
#[derive(Clone)]
pub enum SessionHandle {
    Async(Arc<dyn Session>),
    Sync(Arc<dyn SyncSession>),
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Async(_) => f.write_str("SessionHandle::Async"),
            Self::Sync(_) => f.write_str("SessionHandle::Sync"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_displays_payload() {
        let err = TransportError::Query {
            errors: serde_json::json!([{"message": "boom"}]),
        };
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn timeout_is_distinguishable() {
        assert!(matches!(TransportError::Timeout, TransportError::Timeout));
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
    }
}
