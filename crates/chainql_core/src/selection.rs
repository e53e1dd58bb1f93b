//! The selection chain: an immutable, forkable path of field selections.

use crate::error::{Error, Result};
use crate::query::{Document, SelectionNode};
use crate::session::SessionHandle;
use crate::value::Value;
use indexmap::IndexMap;

/// One named selection step with its call arguments.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) type_name: String,
    pub(crate) name: String,
    pub(crate) args: IndexMap<String, Value>,
}

impl Field {
    pub fn new(
        type_name: impl Into<String>,
        name: impl Into<String>,
        args: IndexMap<String, Value>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            args,
        }
    }

    /// GraphQL type name the field is selected on.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Field name as it appears in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's argument map, in insertion order.
    pub fn args(&self) -> &IndexMap<String, Value> {
        &self.args
    }
}

/// An in-progress query path from the root to the currently requested
/// value.
///
/// [`Chain::select`] is the only way to grow a chain: it copies the
/// selection sequence and appends one field, so siblings forked from a
/// common prefix share nothing mutable and never observe each other's later
/// selections or resolved arguments. Executing a chain consumes it —
/// resolution rewrites the chain's private argument storage, so a chain is
/// submitted at most once.
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) session: SessionHandle,
    pub(crate) selections: Vec<Field>,
}

impl Chain {
    /// Creates the root chain (no selections yet) bound to a session.
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
            selections: Vec::new(),
        }
    }

    /// Forks the chain with one more selection appended. The source chain
    /// is left untouched.
    #[must_use]
    pub fn select(
        &self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        args: IndexMap<String, Value>,
    ) -> Self {
        let mut selections = self.selections.clone();
        selections.push(Field::new(type_name, field_name, args));
        Self {
            session: self.session.clone(),
            selections,
        }
    }

    /// The selections from root to leaf.
    pub fn selections(&self) -> &[Field] {
        &self.selections
    }

    /// Folds the selections into a single nested tree: the last-added field
    /// becomes the leaf, each earlier field wraps the node built so far.
    pub fn build(&self) -> Result<SelectionNode> {
        let mut fields = self.selections.clone();
        let Some(leaf) = fields.pop() else {
            return Err(Error::InvalidQuery("no field has been selected".into()));
        };

        let mut node = SelectionNode::leaf(leaf);
        while let Some(parent) = fields.pop() {
            node = SelectionNode::nested(parent, node);
        }
        Ok(node)
    }

    /// Wraps the built selection tree into a top-level read operation.
    pub fn query(&self) -> Result<Document> {
        Document::query(&self.build()?)
    }
}
