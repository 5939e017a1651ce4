//! Graphlet Storage - Graph store backends
//!
//! This crate defines the [`GraphStore`] trait the HTTP layer talks to and
//! the in-memory backend that implements it.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use traits::{GraphStore, NodeDeletion};
