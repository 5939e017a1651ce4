//! Whole-graph snapshot types

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::relationship::Relationship;

/// Graph containing nodes and their relationships, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }
}

/// Collection sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub relationships: usize,
}

impl GraphStats {
    pub fn new(nodes: usize, relationships: usize) -> Self {
        Self {
            nodes,
            relationships,
        }
    }
}
