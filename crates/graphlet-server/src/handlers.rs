//! HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use graphlet_core::{
    Attributes, Graph, NewNode, NewRelationship, Node, NodeId, Relationship, RelationshipId,
};
use graphlet_storage::GraphStore;
use serde::Serialize;

use crate::error::ApiError;
use crate::server::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Confirmation body for deletions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_relationships: Option<usize>,
}

/// Health check body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: &'static str,
    pub version: &'static str,
    pub nodes: usize,
    pub relationships: usize,
}

/// GET /health
pub async fn health<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<HealthResponse>> {
    let stats = state
        .store
        .stats()
        .await
        .map_err(|e| ApiError::from_storage(e, "Error fetching graph data"))?;

    Ok(Json(HealthResponse {
        status: "ok",
        server: "graphlet",
        version: env!("CARGO_PKG_VERSION"),
        nodes: stats.nodes,
        relationships: stats.relationships,
    }))
}

/// GET /api/graph
pub async fn get_graph<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<Graph>> {
    let graph = state
        .store
        .read_graph()
        .await
        .map_err(|e| ApiError::from_storage(e, "Error fetching graph data"))?;
    Ok(Json(graph))
}

/// POST /api/nodes
pub async fn create_node<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<Attributes>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Node>)> {
    let Json(fields) = body?;
    let new = NewNode::from_fields(fields)?;

    let node = state
        .store
        .create_node(new)
        .await
        .map_err(|e| ApiError::from_storage(e, "Error creating node"))?;

    tracing::info!("Created node {} ({})", node.id, node.name);
    Ok((StatusCode::CREATED, Json(node)))
}

/// GET /api/nodes/:id
pub async fn get_node<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Node>> {
    let id = NodeId::from_path(&id)?.ok_or_else(node_not_found)?;

    let node = state
        .store
        .get_node(id)
        .await
        .map_err(|e| ApiError::from_storage(e, "Error fetching node"))?;
    Ok(Json(node))
}

/// DELETE /api/nodes/:id
pub async fn delete_node<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = NodeId::from_path(&id)?.ok_or_else(node_not_found)?;

    let deletion = state
        .store
        .delete_node(id)
        .await
        .map_err(|e| ApiError::from_storage(e, "Error deleting node"))?;

    tracing::info!(
        "Deleted node {} with {} relationship(s)",
        id,
        deletion.removed_relationships
    );
    Ok(Json(DeleteResponse {
        message: "Node and related relationships deleted successfully",
        removed_relationships: Some(deletion.removed_relationships),
    }))
}

/// GET /api/nodes/:id/relationships
pub async fn node_relationships<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Relationship>>> {
    let Some(id) = NodeId::from_path(&id)? else {
        return Ok(Json(Vec::new()));
    };

    let relationships = state
        .store
        .relationships_for_node(id)
        .await
        .map_err(|e| ApiError::from_storage(e, "Error fetching relationships"))?;
    Ok(Json(relationships))
}

/// POST /api/relationships
pub async fn create_relationship<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<Attributes>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Relationship>)> {
    let Json(fields) = body?;
    let new = NewRelationship::from_fields(fields)?;

    let relationship = state
        .store
        .create_relationship(new)
        .await
        .map_err(|e| ApiError::from_storage(e, "Error creating relationship"))?;

    tracing::info!(
        "Created relationship {} ({} -[{}]-> {})",
        relationship.id,
        relationship.from_node_name,
        relationship.relationship,
        relationship.to_node_name
    );
    Ok((StatusCode::CREATED, Json(relationship)))
}

/// DELETE /api/relationships/:id
pub async fn delete_relationship<S: GraphStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = RelationshipId::from_path(&id)?
        .ok_or_else(|| ApiError::NotFound("Relationship not found".to_string()))?;

    state
        .store
        .delete_relationship(id)
        .await
        .map_err(|e| ApiError::from_storage(e, "Error deleting relationship"))?;

    tracing::info!("Deleted relationship {}", id);
    Ok(Json(DeleteResponse {
        message: "Relationship deleted successfully",
        removed_relationships: None,
    }))
}

fn node_not_found() -> ApiError {
    ApiError::NotFound("Node not found".to_string())
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
