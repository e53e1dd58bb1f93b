//! Base layer for object-typed API wrappers.
//!
//! Generated bindings (the thousands of typed field accessors) live outside
//! this crate; everything they need from the core is here: argument packing
//! with defaulted-argument skipping, the custom scalar newtype, and a
//! chain-carrying object base that knows how to fetch its own ID.

use crate::error::Result;
use crate::selection::Chain;
use crate::session::{Session, SessionHandle, SyncSession};
use crate::value::{Identifiable, Value};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A named call argument. `None` means the caller left an optional argument
/// at its default; it is then omitted from the document entirely.
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: &'static str,
    pub value: Option<Value>,
}

impl Arg {
    /// A provided argument.
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Self {
            name,
            value: Some(value.into()),
        }
    }

    /// An optional argument, omitted when `None`.
    pub fn opt(name: &'static str, value: Option<impl Into<Value>>) -> Self {
        Self {
            name,
            value: value.map(Into::into),
        }
    }
}

/// Collects provided arguments into an ordered argument map, skipping
/// defaulted optionals.
pub fn build_args(args: Vec<Arg>) -> IndexMap<String, Value> {
    args.into_iter()
        .filter_map(|arg| arg.value.map(|v| (arg.name.to_string(), v)))
        .collect()
}

/// A custom scalar, carried as its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scalar(pub String);

impl Scalar {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Json(serde_json::Value::String(scalar.0))
    }
}

/// Base for object-typed wrappers: a chain positioned at an object of the
/// given GraphQL type. Forking the chain through [`TypeRef::select`] is how
/// wrappers implement their field accessors.
#[derive(Debug, Clone)]
pub struct TypeRef {
    chain: Chain,
    type_name: &'static str,
}

impl TypeRef {
    pub fn new(chain: Chain, type_name: &'static str) -> Self {
        Self { chain, type_name }
    }

    /// The object's GraphQL type name.
    pub fn graphql_name(&self) -> &'static str {
        self.type_name
    }

    /// Forks the underlying chain with one more selection on this type.
    #[must_use]
    pub fn select(&self, field_name: impl Into<String>, args: Vec<Arg>) -> Chain {
        self.chain.select(self.type_name, field_name, build_args(args))
    }
}

/// Objects fetch their canonical identifier by lazily executing an `id`
/// selection on a fork of their own chain. A failure of that nested chain
/// propagates unchanged into the outer resolution.
#[async_trait]
impl Identifiable for TypeRef {
    async fn id(&self) -> Result<String> {
        self.select("id", Vec::new()).execute().await
    }

    fn id_sync(&self) -> Result<String> {
        self.select("id", Vec::new()).execute_sync()
    }
}

/// The top-level query object; every chain starts from one of these.
#[derive(Debug, Clone)]
pub struct Root {
    inner: TypeRef,
}

impl Root {
    /// Binds the root to an asynchronous session.
    pub fn from_session(session: Arc<dyn Session>) -> Self {
        Self {
            inner: TypeRef::new(Chain::new(SessionHandle::Async(session)), "Query"),
        }
    }

    /// Binds the root to a blocking session.
    pub fn from_sync_session(session: Arc<dyn SyncSession>) -> Self {
        Self {
            inner: TypeRef::new(Chain::new(SessionHandle::Sync(session)), "Query"),
        }
    }

    /// The root's GraphQL type name.
    pub fn graphql_name(&self) -> &'static str {
        self.inner.graphql_name()
    }

    /// Forks a chain selecting a top-level field.
    #[must_use]
    pub fn select(&self, field_name: impl Into<String>, args: Vec<Arg>) -> Chain {
        self.inner.select(field_name, args)
    }
}
