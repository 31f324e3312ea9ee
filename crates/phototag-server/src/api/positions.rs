//! Predefined position endpoints

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadPositionsRequest {
    pub name: String,
    pub content: String,
}

/// POST /api/positions/upload
pub async fn upload_positions(
    State(state): State<AppState>,
    Json(request): Json<UploadPositionsRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    let count = session.load_positions(&request.content, &request.name)?;
    Ok(Json(json!({
        "success": true,
        "file": request.name,
        "count": count,
        "total": session.positions.len(),
    })))
}

/// GET /api/positions
pub async fn list_positions(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let session = state.session.read().await;
    Ok(Json(json!({
        "success": true,
        "count": session.positions.len(),
        "positions": session.positions.all(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct RemovePositionsRequest {
    pub source_file: String,
}

/// POST /api/positions/remove
pub async fn remove_positions(
    State(state): State<AppState>,
    Json(request): Json<RemovePositionsRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    let removed = session.remove_positions_by_file(&request.source_file);
    Ok(Json(json!({
        "success": true,
        "removed": removed,
        "count": session.positions.len(),
    })))
}
