//! Storage error types

use graphlet_core::{NodeId, RelationshipId};
use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error(transparent)]
    Invalid(#[from] graphlet_core::Error),

    #[error("Invalid nodes selected")]
    InvalidNodes,

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(RelationshipId),

    #[error("Lock error: {0}")]
    Lock(String),
}
