//! Argument values and the identifier capability.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// The "has a canonical identifier" capability.
///
/// Any value participating as an argument may reference a remote object; it
/// must then be able to produce the object's server-assigned ID before the
/// containing query is sent. How the ID is obtained is the implementor's
/// business — object wrappers typically execute their own `id` selection
/// lazily (see [`TypeRef`](crate::TypeRef)).
#[async_trait]
pub trait Identifiable: Send + Sync {
    /// Fetches the identifier, suspending on the underlying session.
    async fn id(&self) -> Result<String>;

    /// Fetches the identifier over a blocking session.
    fn id_sync(&self) -> Result<String>;
}

/// An argument value for a selection.
#[derive(Clone)]
pub enum Value {
    /// Plain JSON-shaped data: scalars, strings, numbers, booleans, nulls,
    /// input objects.
    Json(serde_json::Value),
    /// An enum member, rendered without quotes.
    Enum(String),
    /// A reference to a typed remote object; replaced by the object's ID
    /// during reference resolution.
    Object(Arc<dyn Identifiable>),
    /// A finite ordered sequence; elements may themselves be object
    /// references.
    List(Vec<Value>),
}

impl Value {
    /// Wraps an object reference.
    pub fn object(obj: impl Identifiable + 'static) -> Self {
        Self::Object(Arc::new(obj))
    }

    /// Wraps an enum member.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    /// Returns the string form when the value is a resolved identifier or
    /// any other plain string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Self::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Json(serde_json::Value::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Json(serde_json::Value::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Json(serde_json::Value::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Json(serde_json::Value::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Json(serde_json::Value::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Json(serde_json::Value::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Json(serde_json::Value::from(v))
    }
}

impl From<Arc<dyn Identifiable>> for Value {
    fn from(v: Arc<dyn Identifiable>) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Json(serde_json::Value::Null),
        }
    }
}
