//! Document building: a resolved chain folded into one nested selection
//! tree and rendered as a server-submittable read operation.

use crate::error::{Error, Result};
use crate::selection::Field;
use crate::value::Value;
use std::fmt;

/// A field selection with an optional nested child selection. Built by
/// [`Chain::build`](crate::Chain::build), which folds the chain from the
/// tail outward so chain order is root to leaf.
#[derive(Debug, Clone)]
pub struct SelectionNode {
    field: Field,
    child: Option<Box<SelectionNode>>,
}

impl SelectionNode {
    pub(crate) fn leaf(field: Field) -> Self {
        Self { field, child: None }
    }

    pub(crate) fn nested(field: Field, child: SelectionNode) -> Self {
        Self {
            field,
            child: Some(Box::new(child)),
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn child(&self) -> Option<&SelectionNode> {
        self.child.as_deref()
    }

    fn render(&self, out: &mut String) -> Result<()> {
        out.push_str(self.field.name());
        if !self.field.args().is_empty() {
            out.push('(');
            for (i, (key, value)) in self.field.args().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                render_value(value, out)?;
            }
            out.push(')');
        }
        if let Some(child) = &self.child {
            out.push('{');
            child.render(out)?;
            out.push('}');
        }
        Ok(())
    }
}

/// A fully rendered, server-submittable document. Stateless and derived: it
/// can be rebuilt from the chain at will.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
}

impl Document {
    /// Renders a selection tree wrapped in a top-level read operation.
    pub fn query(root: &SelectionNode) -> Result<Self> {
        let mut text = String::from("query{");
        root.render(&mut text)?;
        text.push('}');
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders an argument value as a GraphQL literal. Object references must
/// have been resolved to IDs before rendering.
fn render_value(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Json(json) => {
            render_json(json, out);
            Ok(())
        }
        Value::Enum(name) => {
            out.push_str(name);
            Ok(())
        }
        Value::Object(_) => Err(Error::InvalidQuery(
            "unresolved object reference in argument; IDs are resolved before building".into(),
        )),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_value(item, out)?;
            }
            out.push(']');
            Ok(())
        }
    }
}

fn render_json(value: &serde_json::Value, out: &mut String) {
    use serde_json::Value as Json;

    match value {
        Json::Null => out.push_str("null"),
        Json::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Json::Number(n) => out.push_str(&n.to_string()),
        Json::String(s) => render_string(s, out),
        Json::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_json(item, out);
            }
            out.push(']');
        }
        // Input object keys are bare identifiers, unlike JSON.
        Json::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                render_json(item, out);
            }
            out.push('}');
        }
    }
}

fn render_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn field(name: &str, args: IndexMap<String, Value>) -> Field {
        Field::new("Container", name, args)
    }

    fn one_arg(key: &str, value: Value) -> IndexMap<String, Value> {
        IndexMap::from([(key.to_string(), value)])
    }

    #[test]
    fn renders_nested_selections_with_args() {
        let leaf = SelectionNode::leaf(field("stdout", IndexMap::new()));
        let exec = SelectionNode::nested(
            field("withExec", one_arg("args", Value::from(vec!["echo", "hi"]))),
            leaf,
        );
        let root = SelectionNode::nested(field("from", one_arg("address", "alpine".into())), exec);

        let doc = Document::query(&root).unwrap();
        assert_eq!(
            doc.as_str(),
            "query{from(address:\"alpine\"){withExec(args:[\"echo\",\"hi\"]){stdout}}}"
        );
    }

    #[test]
    fn renders_multiple_args_in_insertion_order() {
        let mut args = IndexMap::new();
        args.insert("path".to_string(), Value::from("/out"));
        args.insert("allowParent".to_string(), Value::from(true));
        let doc = Document::query(&SelectionNode::leaf(field("export", args))).unwrap();
        assert_eq!(
            doc.as_str(),
            "query{export(path:\"/out\",allowParent:true)}"
        );
    }

    #[test]
    fn escapes_strings() {
        let args = one_arg("cmd", Value::from("echo \"a\\b\"\n"));
        let doc = Document::query(&SelectionNode::leaf(field("run", args))).unwrap();
        assert_eq!(doc.as_str(), "query{run(cmd:\"echo \\\"a\\\\b\\\"\\n\")}");
    }

    #[test]
    fn enum_values_render_bare() {
        let args = one_arg("protocol", Value::enumeration("TCP"));
        let doc = Document::query(&SelectionNode::leaf(field("port", args))).unwrap();
        assert_eq!(doc.as_str(), "query{port(protocol:TCP)}");
    }

    #[test]
    fn input_object_keys_are_unquoted() {
        let args = one_arg(
            "opts",
            Value::from(serde_json::json!({"follow": true, "depth": 2})),
        );
        let doc = Document::query(&SelectionNode::leaf(field("log", args))).unwrap();
        assert_eq!(doc.as_str(), "query{log(opts:{depth:2,follow:true})}");
    }

    #[test]
    fn unresolved_object_is_rejected() {
        use crate::value::Identifiable;
        use async_trait::async_trait;

        struct Fixed;

        #[async_trait]
        impl Identifiable for Fixed {
            async fn id(&self) -> Result<String> {
                Ok("id".into())
            }

            fn id_sync(&self) -> Result<String> {
                Ok("id".into())
            }
        }

        let args = one_arg("dir", Value::object(Fixed));
        let err = Document::query(&SelectionNode::leaf(field("withDirectory", args))).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }
}
