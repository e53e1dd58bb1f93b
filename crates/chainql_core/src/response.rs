//! Response decoding: walking the response along the chain's field path and
//! converting the leaf into the caller's type.

use crate::error::{Error, Result};
use crate::selection::Chain;
use serde::de::DeserializeOwned;

impl Chain {
    /// Extracts and decodes the portion of the response corresponding to
    /// this chain.
    ///
    /// An absent or null leaf decodes to `T`'s null form when `T` accepts
    /// one (an `Option`, say) and raises [`Error::RequiredNull`] otherwise.
    pub(crate) fn get_value<T: DeserializeOwned>(
        &self,
        value: Option<serde_json::Value>,
    ) -> Result<T> {
        let leaf = match value {
            Some(response) => self.structure_response(response)?,
            None => serde_json::Value::Null,
        };
        if leaf.is_null() {
            return serde_json::from_value(leaf).map_err(|_| Error::RequiredNull);
        }
        serde_json::from_value(leaf).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Walks the response along the chain's field names, root to leaf,
    /// short-circuiting to null as soon as any intermediate value is null.
    /// Structural type conversion of the leaf happens in
    /// [`Chain::get_value`], at the true dynamic boundary.
    fn structure_response(&self, mut response: serde_json::Value) -> Result<serde_json::Value> {
        for field in &self.selections {
            if response.is_null() {
                return Ok(serde_json::Value::Null);
            }
            response = match response {
                serde_json::Value::Object(mut map) => {
                    map.remove(field.name()).ok_or_else(|| {
                        Error::Decode(format!("response is missing field `{}`", field.name()))
                    })?
                }
                other => {
                    return Err(Error::Decode(format!(
                        "expected an object at `{}`, got `{other}`",
                        field.name()
                    )))
                }
            };
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Document;
    use crate::session::{Session, SessionHandle, TransportError};
    use async_trait::async_trait;
    use indexmap::IndexMap;
    use serde::Deserialize;
    use std::sync::Arc;

    struct NullSession;

    #[async_trait]
    impl Session for NullSession {
        async fn execute(&self, _document: &Document) -> Result<serde_json::Value, TransportError> {
            Ok(serde_json::Value::Null)
        }
    }

    fn chain(path: &[&str]) -> Chain {
        let mut chain = Chain::new(SessionHandle::Async(Arc::new(NullSession)));
        for name in path {
            chain = chain.select("Test", *name, IndexMap::new());
        }
        chain
    }

    #[test]
    fn decodes_the_leaf_along_the_selection_path() {
        let response = serde_json::json!({"a": {"b": {"c": "hi\n"}}});
        let value: String = chain(&["a", "b", "c"]).get_value(Some(response)).unwrap();
        assert_eq!(value, "hi\n");
    }

    #[test]
    fn null_intermediate_short_circuits_without_decoding_deeper() {
        // Path is a/b/c but b is already null; no error, just a null.
        let response = serde_json::json!({"a": {"b": null}});
        let value: Option<String> = chain(&["a", "b", "c"]).get_value(Some(response)).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn null_leaf_in_required_position_is_an_error() {
        let response = serde_json::json!({"a": null});
        let err = chain(&["a"]).get_value::<String>(Some(response)).unwrap_err();
        assert!(matches!(err, Error::RequiredNull));
    }

    #[test]
    fn absent_response_in_required_position_is_an_error() {
        let err = chain(&["a"]).get_value::<String>(None).unwrap_err();
        assert!(matches!(err, Error::RequiredNull));
    }

    #[test]
    fn absent_response_in_optional_position_is_none() {
        let value: Option<String> = chain(&["a"]).get_value(None).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn missing_field_is_a_decode_error() {
        let response = serde_json::json!({"a": {}});
        let err = chain(&["a", "b"]).get_value::<String>(Some(response)).unwrap_err();
        assert!(matches!(err, Error::Decode(msg) if msg.contains("`b`")));
    }

    #[test]
    fn composite_leaves_build_field_by_field() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Port {
            port: u16,
            protocol: Protocol,
        }

        #[derive(Debug, Deserialize, PartialEq)]
        enum Protocol {
            #[serde(rename = "TCP")]
            Tcp,
            #[serde(rename = "UDP")]
            Udp,
        }

        let response = serde_json::json!({"ports": [
            {"port": 80, "protocol": "TCP"},
            {"port": 53, "protocol": "UDP"},
        ]});
        let ports: Vec<Port> = chain(&["ports"]).get_value(Some(response)).unwrap();
        assert_eq!(
            ports,
            vec![
                Port { port: 80, protocol: Protocol::Tcp },
                Port { port: 53, protocol: Protocol::Udp },
            ]
        );

        // Unknown enum members are rejected at the dynamic boundary.
        let bad = serde_json::json!({"ports": [{"port": 1, "protocol": "ICMP"}]});
        let err = chain(&["ports"]).get_value::<Vec<Port>>(Some(bad)).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
