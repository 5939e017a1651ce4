//! Graphlet Core - Data model for the in-memory property graph
//!
//! This crate provides the node and relationship types, their creation
//! payloads and the identifier sequence shared by every storage backend.

pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod relationship;
pub mod timestamp;

pub use error::{Error, Result};
pub use graph::{Graph, GraphStats};
pub use id::{IdSequence, NodeId, RelationshipId};
pub use node::{NewNode, Node};
pub use relationship::{NewRelationship, Relationship};

/// Open set of caller-supplied attributes merged into nodes and relationships
pub type Attributes = serde_json::Map<String, serde_json::Value>;
