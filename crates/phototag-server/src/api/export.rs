//! Export endpoint

use axum::extract::State;
use axum::Json;
use phototag_app::export;
use phototag_types::PhotoFilter;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub destination: String,
    #[serde(default)]
    pub filter_type: Option<String>,
}

/// POST /api/export
///
/// Exports the selected photos with their resolved metadata; per-photo
/// failures are listed in the report while the batch continues.
pub async fn export_photos(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Json<Value>> {
    let selection = PhotoFilter::parse(request.filter_type.as_deref().unwrap_or("all"));
    let session = state.session.read().await;
    let report = export::export_photos(
        &session.ledger,
        std::path::Path::new(&request.destination),
        selection,
    )?;
    Ok(Json(json!({
        "success": true,
        "destination": request.destination,
        "report": report,
    })))
}
