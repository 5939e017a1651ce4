//! Relationship (edge) types and creation payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::id::{NodeId, RelationshipId};
use crate::node::{strip_reserved, take_required_str, Node};
use crate::Attributes;

/// Keys owned by the system; caller attributes never override them
pub const RESERVED_RELATIONSHIP_KEYS: &[&str] = &[
    "id",
    "from",
    "to",
    "relationship",
    "fromNodeName",
    "toNodeName",
    "createdAt",
];

const MISSING_RELATIONSHIP_FIELDS: &str = "From, to, and relationship are required";

/// A directed, labeled relationship between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Unique identifier
    pub id: RelationshipId,

    /// Source node ID
    pub from: NodeId,

    /// Target node ID
    pub to: NodeId,

    /// Relationship label (e.g. "KNOWS")
    pub relationship: String,

    /// Source node name at creation time
    pub from_node_name: String,

    /// Target node name at creation time
    pub to_node_name: String,

    /// Creation timestamp
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,

    /// Caller-supplied fields, flattened into the JSON object
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Relationship {
    /// Build a relationship between two resolved nodes.
    ///
    /// Endpoint names are copied from the nodes as they are now and are not
    /// updated afterwards.
    pub fn new(
        id: RelationshipId,
        created_at: DateTime<Utc>,
        from: &Node,
        to: &Node,
        new: NewRelationship,
    ) -> Self {
        Self {
            id,
            from: from.id,
            to: to.id,
            relationship: new.relationship,
            from_node_name: from.name.clone(),
            to_node_name: to.name.clone(),
            created_at,
            attributes: new.attributes,
        }
    }

    /// Whether either endpoint is `node`
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

/// Data for creating a new relationship.
///
/// Endpoints are kept in canonical string form so that `5` and `"5"` refer to
/// the same node; they are resolved against existing nodes by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRelationship {
    pub from: String,
    pub to: String,
    pub relationship: String,
    pub attributes: Attributes,
}

impl NewRelationship {
    pub fn new(
        from: impl ToString,
        to: impl ToString,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            relationship: relationship.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_RELATIONSHIP_KEYS.contains(&key.as_str()) {
            self.attributes.insert(key, value.into());
        }
        self
    }

    /// Build a payload from an open JSON object.
    ///
    /// `from` and `to` may be numbers or strings; `relationship` must be a
    /// non-empty string. Remaining non-reserved keys become attributes.
    pub fn from_fields(mut fields: Attributes) -> Result<Self> {
        let from = take_node_ref(&mut fields, "from")?;
        let to = take_node_ref(&mut fields, "to")?;
        let relationship =
            take_required_str(&mut fields, "relationship", MISSING_RELATIONSHIP_FIELDS)?;
        strip_reserved(&mut fields, RESERVED_RELATIONSHIP_KEYS);

        let new = Self {
            from,
            to,
            relationship,
            attributes: fields,
        };
        new.validate()?;
        Ok(new)
    }

    pub fn validate(&self) -> Result<()> {
        if self.from.is_empty() || self.to.is_empty() || self.relationship.is_empty() {
            return Err(Error::validation(MISSING_RELATIONSHIP_FIELDS));
        }
        Ok(())
    }

    /// Whether `node` is the node this payload's `from` refers to
    pub fn refers_from(&self, node: NodeId) -> bool {
        self.from == node.to_string()
    }

    /// Whether `node` is the node this payload's `to` refers to
    pub fn refers_to(&self, node: NodeId) -> bool {
        self.to == node.to_string()
    }
}

/// Remove a node reference and normalize it to its string form
fn take_node_ref(fields: &mut Attributes, key: &str) -> Result<String> {
    match fields.remove(key) {
        None | Some(Value::Null) => Err(Error::validation(MISSING_RELATIONSHIP_FIELDS)),
        Some(Value::String(s)) if s.is_empty() => {
            Err(Error::validation(MISSING_RELATIONSHIP_FIELDS))
        }
        Some(Value::String(s)) => Ok(s),
        Some(other) => Ok(other.to_string()),
    }
}
