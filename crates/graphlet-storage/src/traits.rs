//! Graph store trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use graphlet_core::{
    Graph, GraphStats, NewNode, NewRelationship, Node, NodeId, Relationship, RelationshipId,
};

/// Outcome of deleting a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDeletion {
    /// The node that was removed
    pub node: Node,

    /// Number of relationships removed along with it
    pub removed_relationships: usize,
}

/// Trait for graph store implementations
///
/// Every operation is atomic with respect to every other: readers never see a
/// node deletion without its cascading relationship removals.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Graph Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of every node and relationship, in creation order
    async fn read_graph(&self) -> StorageResult<Graph>;

    /// Collection sizes
    async fn stats(&self) -> StorageResult<GraphStats>;

    // ─────────────────────────────────────────────────────────────────────────
    // Node Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a node, assigning its id and creation time
    async fn create_node(&self, node: NewNode) -> StorageResult<Node>;

    /// Get a node by id
    async fn get_node(&self, id: NodeId) -> StorageResult<Node>;

    /// Delete a node and every relationship that references it
    async fn delete_node(&self, id: NodeId) -> StorageResult<NodeDeletion>;

    // ─────────────────────────────────────────────────────────────────────────
    // Relationship Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a relationship between two existing nodes
    async fn create_relationship(&self, relationship: NewRelationship)
        -> StorageResult<Relationship>;

    /// Delete a relationship by id
    async fn delete_relationship(&self, id: RelationshipId) -> StorageResult<Relationship>;

    /// Relationships starting or ending at `id`.
    ///
    /// The node itself is not required to exist; an unknown id has no
    /// relationships.
    async fn relationships_for_node(&self, id: NodeId) -> StorageResult<Vec<Relationship>>;
}
