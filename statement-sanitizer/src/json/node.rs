//! The redacted JSON tree and its serde glue.

use std::{cell::Cell, fmt};

use serde::{
    Serialize, Serializer,
    de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor},
    ser::SerializeMap,
};

use crate::{
    error::{SanitizeError, SourceFormat},
    policy::PLACEHOLDER,
};

/// A JSON document with its leaf values erased.
///
/// Objects keep their entries in input order, duplicates included. Arrays keep
/// their length. `Scalar` stands for any string, number, boolean or null and
/// serializes as `"?"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsonNode {
    Object(Vec<(String, JsonNode)>),
    Array(Vec<JsonNode>),
    Scalar,
}

impl JsonNode {
    /// Parses `text`, rejecting documents nested deeper than `max_depth`.
    pub fn parse(text: &str, max_depth: usize) -> Result<Self, SanitizeError> {
        let exceeded = Cell::new(false);
        let seed = NodeSeed {
            depth: 0,
            max_depth,
            exceeded: &exceeded,
        };

        let mut de = serde_json::Deserializer::from_str(text);
        let parsed = seed.deserialize(&mut de).and_then(|node| {
            de.end()?;
            Ok(node)
        });

        match parsed {
            Ok(node) => Ok(node),
            Err(_) if exceeded.get() => Err(SanitizeError::DepthLimitExceeded { limit: max_depth }),
            Err(err) => Err(SanitizeError::parse(SourceFormat::Json, err)),
        }
    }

    /// Compact JSON text with every scalar rendered as `"?"`.
    pub fn to_json(&self) -> String {
        // Serializing this tree into a String cannot fail: keys are strings
        // and there are no custom errors.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for JsonNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Array(items) => serializer.collect_seq(items),
            Self::Scalar => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

/// Builds a [`JsonNode`] while tracking how deep the parser is.
#[derive(Clone, Copy)]
struct NodeSeed<'a> {
    depth: usize,
    max_depth: usize,
    exceeded: &'a Cell<bool>,
}

impl NodeSeed<'_> {
    fn nested<E: de::Error>(self) -> Result<Self, E> {
        if self.depth >= self.max_depth {
            self.exceeded.set(true);
            return Err(E::custom(format_args!(
                "nesting exceeds the depth limit of {}",
                self.max_depth
            )));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }
}

impl<'de> DeserializeSeed<'de> for NodeSeed<'_> {
    type Value = JsonNode;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for NodeSeed<'_> {
    type Value = JsonNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, _: bool) -> Result<JsonNode, E>
    where
        E: de::Error,
    {
        Ok(JsonNode::Scalar)
    }

    fn visit_i64<E>(self, _: i64) -> Result<JsonNode, E>
    where
        E: de::Error,
    {
        Ok(JsonNode::Scalar)
    }

    fn visit_u64<E>(self, _: u64) -> Result<JsonNode, E>
    where
        E: de::Error,
    {
        Ok(JsonNode::Scalar)
    }

    fn visit_f64<E>(self, _: f64) -> Result<JsonNode, E>
    where
        E: de::Error,
    {
        Ok(JsonNode::Scalar)
    }

    fn visit_str<E>(self, _: &str) -> Result<JsonNode, E>
    where
        E: de::Error,
    {
        Ok(JsonNode::Scalar)
    }

    fn visit_unit<E>(self) -> Result<JsonNode, E>
    where
        E: de::Error,
    {
        Ok(JsonNode::Scalar)
    }

    fn visit_none<E>(self) -> Result<JsonNode, E>
    where
        E: de::Error,
    {
        Ok(JsonNode::Scalar)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<JsonNode, D::Error>
    where
        D: Deserializer<'de>,
    {
        self.deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<JsonNode, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let child = self.nested()?;
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(child)? {
            items.push(item);
        }
        Ok(JsonNode::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<JsonNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        let child = self.nested()?;
        let mut entries = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(child)?;
            entries.push((key, value));
        }
        Ok(JsonNode::Object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_collapse_while_parsing() {
        let node = JsonNode::parse(r#"{"a":[1,"two",null],"b":false}"#, 8).unwrap();
        assert_eq!(
            node,
            JsonNode::Object(vec![
                (
                    "a".to_string(),
                    JsonNode::Array(vec![JsonNode::Scalar, JsonNode::Scalar, JsonNode::Scalar])
                ),
                ("b".to_string(), JsonNode::Scalar),
            ])
        );
    }

    #[test]
    fn duplicate_keys_are_kept_in_order() {
        let node = JsonNode::parse(r#"{"k":1,"j":2,"k":3}"#, 8).unwrap();
        assert_eq!(node.to_json(), r#"{"k":"?","j":"?","k":"?"}"#);
    }

    #[test]
    fn depth_limit_is_enforced() {
        assert!(JsonNode::parse("[[[]]]", 3).is_ok());
        assert_eq!(
            JsonNode::parse("[[[[]]]]", 3),
            Err(SanitizeError::DepthLimitExceeded { limit: 3 })
        );
        assert_eq!(
            JsonNode::parse(r#"{"a":{"b":{}}}"#, 2),
            Err(SanitizeError::DepthLimitExceeded { limit: 2 })
        );
    }

    #[test]
    fn scalar_document_parses_with_zero_depth_limit() {
        let node = JsonNode::parse("42", 0).unwrap();
        assert_eq!(node, JsonNode::Scalar);
        assert_eq!(node.to_json(), r#""?""#);
    }

    #[test]
    fn out_of_range_number_is_a_parse_failure() {
        assert!(matches!(
            JsonNode::parse(r#"{"a":1e400}"#, 4),
            Err(SanitizeError::ParseFailure {
                format: SourceFormat::Json,
                ..
            })
        ));
    }

    #[test]
    fn keys_are_re_escaped() {
        let node = JsonNode::parse(r#"{"a\"b":1}"#, 4).unwrap();
        assert_eq!(node.to_json(), r#"{"a\"b":"?"}"#);
    }
}
