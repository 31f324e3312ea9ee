//! Configuration endpoints

use axum::extract::State;
use axum::Json;
use phototag_app::AppConfig;
use phototag_types::Error;
use serde_json::{json, Value};

use super::ApiResult;
use crate::AppState;

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let session = state.session.read().await;
    Ok(Json(json!({ "success": true, "config": session.config })))
}

/// POST /api/config
///
/// Accepts a partial object and merges it over the current configuration.
pub async fn update_config(
    State(state): State<AppState>,
    Json(updates): Json<Value>,
) -> ApiResult<Json<Value>> {
    let Some(update_map) = updates.as_object() else {
        return Err(Error::Validation("config update must be an object".to_string()).into());
    };

    let mut session = state.session.write().await;
    let mut merged = serde_json::to_value(&session.config).map_err(Error::from)?;
    if let Some(current) = merged.as_object_mut() {
        for (key, value) in update_map {
            current.insert(key.clone(), value.clone());
        }
    }
    let config: AppConfig = serde_json::from_value(merged)
        .map_err(|e| Error::Validation(format!("invalid config update: {e}")))?;

    session.config = config;
    state.save_config(&session);
    Ok(Json(json!({ "success": true, "config": session.config })))
}
