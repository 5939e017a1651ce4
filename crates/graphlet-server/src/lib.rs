//! Graphlet Server - HTTP/JSON API over a graph store
//!
//! Maps REST requests onto [`graphlet_storage::GraphStore`] calls and
//! serializes the results as JSON.

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{create_router, run_server, AppState};
