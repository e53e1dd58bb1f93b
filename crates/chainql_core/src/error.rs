//! Error taxonomy for the query core.
//!
//! Everything [`Chain::execute`](crate::Chain::execute) can raise is covered
//! here: structural misuse of a chain, transport deadlines, server-reported
//! query failures, and unexpected nulls at non-nullable positions. Transport
//! failures that match none of those pass through unchanged.

use crate::query::Document;
use crate::session::TransportError;
use serde::Deserialize;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building, executing, or decoding a query chain.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The chain is structurally invalid for the requested operation.
    /// Always a programmer error; never worth retrying.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The transport deadline elapsed before the server replied. Carries a
    /// remediation hint; retrying is left to the caller.
    #[error("{0}")]
    ExecuteTimeout(String),

    /// The server executed the document but reported a field-level error.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A non-nullable selection resolved to null. The server reported no
    /// failure, which usually means a parent field is the real problem.
    #[error("required field got a null response; check if parent fields are valid")]
    RequiredNull,

    /// The response could not be converted into the requested type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Any other transport failure, passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A server-reported, field-scoped query failure, distinct from transport
/// and connection failures.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct QueryError {
    /// Cleaned message of the first reported error.
    pub message: String,
    /// The document that was sent.
    pub query: Document,
    /// Server-reported path to the failing field.
    pub path: Vec<String>,
    /// Server-reported source locations within the document.
    pub locations: Vec<ErrorLocation>,
}

/// A line/column position reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// One entry of a transport's machine-readable error payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorRecord {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<ErrorLocation>,
    #[serde(default)]
    pub path: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_null_message_points_at_parents() {
        let msg = Error::RequiredNull.to_string();
        assert!(msg.contains("null response"));
        assert!(msg.contains("parent fields"));
    }

    #[test]
    fn error_record_defaults_missing_fields() {
        let record: ErrorRecord =
            serde_json::from_value(serde_json::json!({"message": "boom"})).unwrap();
        assert_eq!(record.message, "boom");
        assert!(record.locations.is_empty());
        assert!(record.path.is_empty());
    }

    #[test]
    fn error_record_parses_locations() {
        let record: ErrorRecord = serde_json::from_value(serde_json::json!({
            "message": "boom",
            "locations": [{"line": 1, "column": 5}],
            "path": ["container", "from"],
        }))
        .unwrap();
        assert_eq!(record.locations, vec![ErrorLocation { line: 1, column: 5 }]);
        assert_eq!(record.path, vec!["container", "from"]);
    }
}
