//! JSON endpoints.

use super::server::AppState;
use crate::error::ApiError;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use vortex_core::{CatalogError, VERSION};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub id: Option<String>,
}

/// GET /api/detail?id=<key>-<native>
pub async fn get_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DetailParams>,
) -> Result<Json<Value>, ApiError> {
    let id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CatalogError::InvalidInput("id is required".to_string()))?;

    let identity = state.caller(&headers);
    let detail = state.detail.get_detail(id, identity.as_deref()).await?;
    Ok(Json(json!({ "detail": detail })))
}

/// Public view of a source. Endpoints stay server-side.
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceSummary {
    pub key: String,
    pub name: String,
    pub priority: i32,
}

/// GET /api/sources - sources available to the caller
pub async fn list_sources(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SourceSummary>>, ApiError> {
    let identity = state.caller(&headers);
    let sources = state
        .registry()
        .resolve_available_sources(identity.as_deref())
        .await?
        .into_iter()
        .map(|s| SourceSummary {
            key: s.key,
            name: s.name,
            priority: s.priority,
        })
        .collect();
    Ok(Json(sources))
}
