//! HTTP client layer for chainql.
//!
//! The query core never talks to the network itself; this crate supplies
//! the sessions it executes through. Both speak GraphQL-over-HTTP with a
//! dependency-free HTTP/1.1 transport: one TCP connection per document, a
//! single deadline covering connect, write, and read.
//!
//! # Example
//!
//! ```ignore
//! use chainql_client::{Client, ClientConfig};
//! use chainql_core::Arg;
//! use std::time::Duration;
//!
//! let client = Client::with_config(
//!     ClientConfig::new("http://localhost:8080/query").timeout(Duration::from_secs(60)),
//! );
//! let root = client.connect()?;
//! let version: String = root.select("version", Vec::new()).execute().await?;
//! ```

pub mod client;
pub mod session;

pub(crate) mod http;

pub use client::{Client, ClientConfig};
pub use session::{BlockingHttpSession, HttpSession};

// Core re-exports, so most callers only depend on this crate.
pub use chainql_core::{
    build_args, Arg, Chain, Document, Error, Identifiable, QueryError, Result, Root, Scalar,
    Session, SessionHandle, SyncSession, TransportError, TypeRef, Value,
};
