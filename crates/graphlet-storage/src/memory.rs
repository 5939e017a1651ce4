//! In-memory storage backend

use crate::error::{StorageError, StorageResult};
use crate::traits::{GraphStore, NodeDeletion};
use async_trait::async_trait;
use chrono::Utc;
use graphlet_core::{
    Graph, GraphStats, IdSequence, NewNode, NewRelationship, Node, NodeId, Relationship,
    RelationshipId,
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything guarded by the store lock
#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<Node>,
    relationships: Vec<Relationship>,
    ids: IdSequence,
}

/// In-memory storage backend
///
/// Nodes, relationships and the id sequence live behind a single lock, so a
/// node deletion and its cascade are applied as one step.
pub struct MemoryStorage {
    state: RwLock<GraphState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(GraphState::default()),
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, GraphState>> {
        self.state
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, GraphState>> {
        self.state
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MemoryStorage {
    async fn read_graph(&self) -> StorageResult<Graph> {
        let state = self.read()?;
        Ok(Graph::new()
            .with_nodes(state.nodes.clone())
            .with_relationships(state.relationships.clone()))
    }

    async fn stats(&self) -> StorageResult<GraphStats> {
        let state = self.read()?;
        Ok(GraphStats::new(state.nodes.len(), state.relationships.len()))
    }

    // Node operations

    async fn create_node(&self, node: NewNode) -> StorageResult<Node> {
        node.validate()?;

        let mut state = self.write()?;
        let now = Utc::now();
        let id = state.ids.next_node_id(now);
        let node = Node::new(id, now, node);
        state.nodes.push(node.clone());

        tracing::debug!("Created node {} ({}: {})", node.id, node.node_type, node.name);
        Ok(node)
    }

    async fn get_node(&self, id: NodeId) -> StorageResult<Node> {
        let state = self.read()?;
        state
            .nodes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(StorageError::NodeNotFound(id))
    }

    async fn delete_node(&self, id: NodeId) -> StorageResult<NodeDeletion> {
        let mut state = self.write()?;
        let pos = state
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(StorageError::NodeNotFound(id))?;

        let node = state.nodes.remove(pos);
        let before = state.relationships.len();
        state.relationships.retain(|r| !r.touches(id));
        let removed_relationships = before - state.relationships.len();

        tracing::debug!(
            "Deleted node {} and {} relationship(s)",
            id,
            removed_relationships
        );
        Ok(NodeDeletion {
            node,
            removed_relationships,
        })
    }

    // Relationship operations

    async fn create_relationship(
        &self,
        relationship: NewRelationship,
    ) -> StorageResult<Relationship> {
        relationship.validate()?;

        let mut state = self.write()?;
        let from = state.nodes.iter().find(|n| relationship.refers_from(n.id));
        let to = state.nodes.iter().find(|n| relationship.refers_to(n.id));
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from.clone(), to.clone()),
            _ => return Err(StorageError::InvalidNodes),
        };

        let now = Utc::now();
        let id = state.ids.next_relationship_id(now);
        let relationship = Relationship::new(id, now, &from, &to, relationship);
        state.relationships.push(relationship.clone());

        tracing::debug!(
            "Created relationship {} ({} -[{}]-> {})",
            relationship.id,
            relationship.from,
            relationship.relationship,
            relationship.to
        );
        Ok(relationship)
    }

    async fn delete_relationship(&self, id: RelationshipId) -> StorageResult<Relationship> {
        let mut state = self.write()?;
        let pos = state
            .relationships
            .iter()
            .position(|r| r.id == id)
            .ok_or(StorageError::RelationshipNotFound(id))?;

        let relationship = state.relationships.remove(pos);
        tracing::debug!("Deleted relationship {}", id);
        Ok(relationship)
    }

    async fn relationships_for_node(&self, id: NodeId) -> StorageResult<Vec<Relationship>> {
        let state = self.read()?;
        Ok(state
            .relationships
            .iter()
            .filter(|r| r.touches(id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::Barrier;

    async fn person(storage: &MemoryStorage, name: &str) -> Node {
        storage
            .create_node(NewNode::new(name, "Person"))
            .await
            .unwrap()
    }

    async fn link(storage: &MemoryStorage, from: &Node, to: &Node, label: &str) -> Relationship {
        storage
            .create_relationship(NewRelationship::new(from.id, to.id, label))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        let alice = storage
            .create_node(NewNode::new("Alice", "Person").with_attribute("age", 30))
            .await
            .unwrap();

        let retrieved = storage.get_node(alice.id).await.unwrap();
        assert_eq!(retrieved, alice);
        assert_eq!(retrieved.name, "Alice");
        assert_eq!(retrieved.node_type, "Person");
        assert_eq!(retrieved.attributes.get("age"), Some(&json!(30)));

        storage.delete_node(alice.id).await.unwrap();
        assert_eq!(
            storage.get_node(alice.id).await,
            Err(StorageError::NodeNotFound(alice.id))
        );
    }

    #[tokio::test]
    async fn test_invalid_node_leaves_store_unchanged() {
        let storage = MemoryStorage::new();
        person(&storage, "Alice").await;

        let result = storage.create_node(NewNode::new("", "Person")).await;
        assert!(matches!(result, Err(StorageError::Invalid(_))));

        let result = storage.create_node(NewNode::new("Bob", "")).await;
        assert!(matches!(result, Err(StorageError::Invalid(_))));

        assert_eq!(storage.stats().await.unwrap().nodes, 1);
    }

    #[tokio::test]
    async fn test_delete_node_cascades() {
        let storage = MemoryStorage::new();
        let alice = person(&storage, "Alice").await;
        let bob = person(&storage, "Bob").await;
        let carol = person(&storage, "Carol").await;

        link(&storage, &alice, &bob, "KNOWS").await;
        link(&storage, &carol, &alice, "FOLLOWS").await;
        link(&storage, &alice, &alice, "SELF").await;
        let untouched = link(&storage, &bob, &carol, "KNOWS").await;

        let deletion = storage.delete_node(alice.id).await.unwrap();
        assert_eq!(deletion.node.id, alice.id);
        assert_eq!(deletion.removed_relationships, 3);

        assert!(storage.relationships_for_node(alice.id).await.unwrap().is_empty());
        assert_eq!(
            storage.relationships_for_node(bob.id).await.unwrap(),
            vec![untouched.clone()]
        );
        assert_eq!(
            storage.relationships_for_node(carol.id).await.unwrap(),
            vec![untouched]
        );
    }

    #[tokio::test]
    async fn test_relationship_requires_existing_nodes() {
        let storage = MemoryStorage::new();
        let alice = person(&storage, "Alice").await;

        let result = storage
            .create_relationship(NewRelationship::new(alice.id, 999_999, "KNOWS"))
            .await;
        assert_eq!(result, Err(StorageError::InvalidNodes));

        let result = storage
            .create_relationship(NewRelationship::new("nobody", alice.id, "KNOWS"))
            .await;
        assert_eq!(result, Err(StorageError::InvalidNodes));

        assert_eq!(storage.stats().await.unwrap().relationships, 0);
    }

    #[tokio::test]
    async fn test_relationship_snapshots_names() {
        let storage = MemoryStorage::new();
        let alice = person(&storage, "Alice").await;
        let bob = person(&storage, "Bob").await;

        let rel = storage
            .create_relationship(
                NewRelationship::new(alice.id.to_string(), bob.id, "KNOWS")
                    .with_attribute("since", 2020),
            )
            .await
            .unwrap();

        assert_eq!(rel.from, alice.id);
        assert_eq!(rel.to, bob.id);
        assert_eq!(rel.from_node_name, "Alice");
        assert_eq!(rel.to_node_name, "Bob");
        assert_eq!(rel.attributes.get("since"), Some(&json!(2020)));
    }

    #[tokio::test]
    async fn test_delete_relationship() {
        let storage = MemoryStorage::new();
        let alice = person(&storage, "Alice").await;
        let bob = person(&storage, "Bob").await;
        let rel = link(&storage, &alice, &bob, "KNOWS").await;

        let removed = storage.delete_relationship(rel.id).await.unwrap();
        assert_eq!(removed.id, rel.id);
        assert_eq!(
            storage.delete_relationship(rel.id).await,
            Err(StorageError::RelationshipNotFound(rel.id))
        );
        assert_eq!(storage.stats().await.unwrap().nodes, 2);
    }

    #[tokio::test]
    async fn test_missing_node_delete_changes_nothing() {
        let storage = MemoryStorage::new();
        let alice = person(&storage, "Alice").await;
        let bob = person(&storage, "Bob").await;
        link(&storage, &alice, &bob, "KNOWS").await;

        let before = storage.read_graph().await.unwrap();
        let result = storage.delete_node(NodeId(999_999)).await;
        assert_eq!(result, Err(StorageError::NodeNotFound(NodeId(999_999))));
        assert_eq!(storage.read_graph().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_read_graph_keeps_creation_order() {
        let storage = MemoryStorage::new();
        let a = person(&storage, "A").await;
        let b = person(&storage, "B").await;
        let c = person(&storage, "C").await;
        let ab = link(&storage, &a, &b, "R1").await;
        let bc = link(&storage, &b, &c, "R2").await;
        let ca = link(&storage, &c, &a, "R3").await;

        storage.delete_relationship(bc.id).await.unwrap();
        storage.delete_node(b.id).await.unwrap();

        let graph = storage.read_graph().await.unwrap();
        let names: Vec<_> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(graph.relationships, vec![ca]);
        assert!(!graph.relationships.contains(&ab));
    }

    #[tokio::test]
    async fn test_relationships_for_unknown_node_is_empty() {
        let storage = MemoryStorage::new();
        assert!(storage
            .relationships_for_node(NodeId(42))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_rapid_creation_ids_are_unique() {
        let storage = MemoryStorage::new();
        let mut ids = HashSet::new();
        for i in 0..500 {
            let node = person(&storage, &format!("n{}", i)).await;
            assert!(ids.insert(node.id.as_u64()));
        }
        let nodes = storage.read_graph().await.unwrap().nodes;
        let a = &nodes[0];
        let b = &nodes[1];
        let rel = link(&storage, a, b, "KNOWS").await;
        assert!(ids.insert(rel.id.as_u64()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_cascade_is_atomic() {
        let storage = Arc::new(MemoryStorage::new());
        let hub = person(&storage, "Hub").await;
        let hub_id = hub.id;
        for i in 0..50 {
            let spoke = person(&storage, &format!("spoke{}", i)).await;
            link(&storage, &hub, &spoke, "LINKS").await;
        }

        let start = Arc::new(Barrier::new(2));

        let reader = {
            let storage = Arc::clone(&storage);
            let start = Arc::clone(&start);
            tokio::spawn(async move {
                start.wait().await;
                // Keep reading until the deletion is observed
                loop {
                    let graph = storage.read_graph().await.unwrap();
                    let hub_present = graph.nodes.iter().any(|n| n.id == hub_id);
                    let dangling = graph.relationships.iter().any(|r| r.touches(hub_id));
                    // Either the hub and all of its links exist, or neither does
                    assert_eq!(hub_present, dangling);
                    if !hub_present {
                        break;
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        let writer = {
            let storage = Arc::clone(&storage);
            let start = Arc::clone(&start);
            tokio::spawn(async move {
                start.wait().await;
                storage.delete_node(hub_id).await.unwrap()
            })
        };

        let deletion = writer.await.unwrap();
        reader.await.unwrap();
        assert_eq!(deletion.removed_relationships, 50);
    }
}
