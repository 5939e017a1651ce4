//! Node types and creation payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::id::NodeId;
use crate::Attributes;

/// Keys owned by the system; caller attributes never override them
pub const RESERVED_NODE_KEYS: &[&str] = &["id", "name", "type", "createdAt"];

const MISSING_NODE_FIELDS: &str = "Name and type are required";

/// A node in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Display name
    pub name: String,

    /// Node type/category
    #[serde(rename = "type")]
    pub node_type: String,

    /// Creation timestamp
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,

    /// Caller-supplied fields, flattened into the JSON object
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Node {
    /// Build a node from a validated payload and system-assigned fields
    pub fn new(id: NodeId, created_at: DateTime<Utc>, new: NewNode) -> Self {
        Self {
            id,
            name: new.name,
            node_type: new.node_type,
            created_at,
            attributes: new.attributes,
        }
    }
}

/// Data for creating a new node
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub name: String,
    pub node_type: String,
    pub attributes: Attributes,
}

impl NewNode {
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_NODE_KEYS.contains(&key.as_str()) {
            self.attributes.insert(key, value.into());
        }
        self
    }

    /// Build a payload from an open JSON object.
    ///
    /// `name` and `type` must be present non-empty strings. Every other key is
    /// kept as an attribute, except the reserved ones.
    pub fn from_fields(mut fields: Attributes) -> Result<Self> {
        let name = take_required_str(&mut fields, "name", MISSING_NODE_FIELDS)?;
        let node_type = take_required_str(&mut fields, "type", MISSING_NODE_FIELDS)?;
        strip_reserved(&mut fields, RESERVED_NODE_KEYS);

        let new = Self {
            name,
            node_type,
            attributes: fields,
        };
        new.validate()?;
        Ok(new)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.node_type.is_empty() {
            return Err(Error::validation(MISSING_NODE_FIELDS));
        }
        Ok(())
    }
}

/// Remove a required string field, failing with `missing` when it is absent,
/// null or empty
pub(crate) fn take_required_str(
    fields: &mut Attributes,
    key: &str,
    missing: &str,
) -> Result<String> {
    match fields.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        None | Some(Value::Null) | Some(Value::String(_)) => Err(Error::validation(missing)),
        Some(_) => Err(Error::validation(format!("Field '{}' must be a string", key))),
    }
}

pub(crate) fn strip_reserved(fields: &mut Attributes, reserved: &[&str]) {
    fields.retain(|key, _| !reserved.contains(&key.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_fields_keeps_extra_attributes() {
        let new = NewNode::from_fields(fields(json!({
            "name": "Alice",
            "type": "Person",
            "age": 30,
            "tags": ["friend"]
        })))
        .unwrap();

        assert_eq!(new.name, "Alice");
        assert_eq!(new.node_type, "Person");
        assert_eq!(new.attributes.get("age"), Some(&json!(30)));
        assert_eq!(new.attributes.get("tags"), Some(&json!(["friend"])));
    }

    #[test]
    fn test_from_fields_requires_name_and_type() {
        let missing_type = NewNode::from_fields(fields(json!({ "name": "Alice" })));
        assert_eq!(
            missing_type,
            Err(Error::Validation("Name and type are required".to_string()))
        );

        let empty_name = NewNode::from_fields(fields(json!({ "name": "", "type": "Person" })));
        assert!(empty_name.is_err());

        let null_name = NewNode::from_fields(fields(json!({ "name": null, "type": "Person" })));
        assert!(null_name.is_err());
    }

    #[test]
    fn test_from_fields_rejects_non_string_name() {
        let err = NewNode::from_fields(fields(json!({ "name": 12, "type": "Person" })))
            .unwrap_err();
        assert_eq!(err.to_string(), "Field 'name' must be a string");
    }

    #[test]
    fn test_reserved_keys_are_dropped() {
        let new = NewNode::from_fields(fields(json!({
            "name": "Alice",
            "type": "Person",
            "id": 1,
            "createdAt": "1999-01-01T00:00:00.000Z"
        })))
        .unwrap();

        assert!(new.attributes.is_empty());

        let built = NewNode::new("Bob", "Person").with_attribute("id", 5);
        assert!(built.attributes.is_empty());
    }

    #[test]
    fn test_node_serializes_flat() {
        let created_at = "2024-05-01T10:00:00.000Z".parse::<DateTime<Utc>>().unwrap();
        let node = Node::new(
            NodeId(17),
            created_at,
            NewNode::new("Alice", "Person").with_attribute("city", "Paris"),
        );

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 17,
                "name": "Alice",
                "type": "Person",
                "createdAt": "2024-05-01T10:00:00.000Z",
                "city": "Paris"
            })
        );
        assert_eq!(node.attributes.get("city"), Some(&json!("Paris")));
    }
}
