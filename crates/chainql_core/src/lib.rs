//! Lazy query construction and execution for graph-shaped remote APIs.
//!
//! Callers grow a [`Chain`] through ordinary method calls; nothing touches
//! the network until a terminal value is requested. At that point the chain
//! resolves object-valued arguments into their server-assigned identifiers
//! (concurrently on async sessions), folds itself into a single nested
//! [`Document`], submits it through the bound session, and decodes the
//! response into the caller's type.
//!
//! # Example
//!
//! ```ignore
//! use chainql_core::{build_args, Arg, Chain, SessionHandle};
//!
//! let chain = Chain::new(SessionHandle::Async(session));
//! let stdout: String = chain
//!     .select("Query", "container", Default::default())
//!     .select("Container", "from", build_args(vec![Arg::new("address", "alpine:3.16.2")]))
//!     .select("Container", "withExec", build_args(vec![Arg::new("args", vec!["echo", "hi"])]))
//!     .select("Container", "stdout", Default::default())
//!     .execute()
//!     .await?;
//! ```
//!
//! Chains fork cheaply: every `select` copies the selection sequence and
//! appends one field, so two chains grown from a common prefix never observe
//! each other's later selections or resolved arguments.

pub mod error;
pub mod object;
pub mod query;
pub mod selection;
pub mod session;
pub mod value;

mod execute;
mod resolve;
mod response;

pub use error::{Error, ErrorLocation, QueryError, Result};
pub use object::{build_args, Arg, Root, Scalar, TypeRef};
pub use query::{Document, SelectionNode};
pub use selection::{Chain, Field};
pub use session::{Session, SessionHandle, SyncSession, TransportError};
pub use value::{Identifiable, Value};
