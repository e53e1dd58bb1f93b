//! Executing a chain: reference resolution, document building, submission
//! through the bound session, and transport error mapping.

use crate::error::{Error, ErrorRecord, QueryError, Result};
use crate::query::Document;
use crate::selection::Chain;
use crate::session::{SessionHandle, TransportError};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

impl Chain {
    /// Requests the chain's terminal value over an asynchronous session.
    ///
    /// Resolves object references concurrently, builds the document, sends
    /// it, and decodes the result into `T`. Consumes the chain: resolution
    /// rewrites its private argument storage, so each chain is executed at
    /// most once.
    pub async fn execute<T: DeserializeOwned>(mut self) -> Result<T> {
        let SessionHandle::Async(session) = &self.session else {
            return Err(Error::InvalidQuery(
                "chain is bound to a blocking session; use execute_sync".into(),
            ));
        };
        let session = Arc::clone(session);

        self.resolve_ids().await?;
        let document = self.query()?;
        debug!(query = document.as_str(), "executing document");

        let data = session
            .execute(&document)
            .await
            .map_err(|e| map_transport_error(e, &document))?;
        self.get_value(nullable(data))
    }

    /// Blocking counterpart of [`Chain::execute`]: identical replacements
    /// and mapping, with reference resolution performed sequentially.
    pub fn execute_sync<T: DeserializeOwned>(mut self) -> Result<T> {
        let SessionHandle::Sync(session) = &self.session else {
            return Err(Error::InvalidQuery(
                "chain is bound to an asynchronous session; use execute".into(),
            ));
        };
        let session = Arc::clone(session);

        self.resolve_ids_sync()?;
        let document = self.query()?;
        debug!(query = document.as_str(), "executing document");

        let data = session
            .execute(&document)
            .map_err(|e| map_transport_error(e, &document))?;
        self.get_value(nullable(data))
    }
}

/// Treats a JSON null as an absent response.
fn nullable(value: serde_json::Value) -> Option<serde_json::Value> {
    (!value.is_null()).then_some(value)
}

/// Maps transport failures into the domain taxonomy. Timeouts get a
/// remediation hint; server-reported query errors are parsed into a
/// [`QueryError`] carrying the offending document. Everything else — and
/// any query payload that does not parse — surfaces unchanged.
fn map_transport_error(error: TransportError, document: &Document) -> Error {
    match error {
        TransportError::Timeout => Error::ExecuteTimeout(
            "request timed out; try a higher `timeout` in the client configuration".into(),
        ),
        TransportError::Query { errors } => match parse_error_payload(&errors) {
            Some(record) => Error::Query(QueryError {
                message: record.message.trim().to_string(),
                query: document.clone(),
                path: record.path,
                locations: record.locations,
            }),
            None => Error::Transport(TransportError::Query { errors }),
        },
        other => Error::Transport(other),
    }
}

/// Parses a transport error payload as an ordered list of error records and
/// picks the first. `None` means the payload has some other shape and the
/// original transport error should be re-raised.
fn parse_error_payload(errors: &serde_json::Value) -> Option<ErrorRecord> {
    serde_json::from_value::<Vec<ErrorRecord>>(errors.clone())
        .ok()?
        .into_iter()
        .next()
}
