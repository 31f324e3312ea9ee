//! GPS track endpoints

use axum::extract::{Path, State};
use axum::Json;
use phototag_store::{format_offset, parse_offset};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadTracksRequest {
    pub files: Vec<TrackFile>,
}

/// POST /api/gpx/upload
///
/// Parses each uploaded file and loads it into the track store; duplicate
/// track names are reported but not stored. A successful load triggers a
/// full re-match of the ledger.
pub async fn upload_tracks(
    State(state): State<AppState>,
    Json(request): Json<UploadTracksRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;

    let mut results = Vec::new();
    for file in &request.files {
        let outcome = session.load_track(&file.content, &file.name)?;
        results.push(json!({
            "file": file.name,
            "loaded": outcome.is_loaded(),
            "track": outcome.record(),
        }));
    }

    Ok(Json(json!({
        "success": true,
        "files_loaded": results.len(),
        "results": results,
        "tracks": session.tracks.tracks(),
    })))
}

/// GET /api/gpx/tracks
pub async fn list_tracks(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let session = state.session.read().await;
    let offsets: Vec<String> = session
        .tracks
        .tracks()
        .iter()
        .map(|t| format_offset(t.offset_seconds))
        .collect();
    Ok(Json(json!({
        "success": true,
        "tracks": session.tracks.tracks(),
        "offsets": offsets,
        "main_offset": format_offset(session.tracks.main_offset()),
        "point_count": session.tracks.point_count(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct OffsetRequest {
    /// Offset in `±HH:MM:SS` form; unparseable input means zero
    pub offset: String,
}

/// POST /api/gpx/offset
pub async fn set_main_offset(
    State(state): State<AppState>,
    Json(request): Json<OffsetRequest>,
) -> ApiResult<Json<Value>> {
    let seconds = parse_offset(&request.offset);
    let mut session = state.session.write().await;
    let report = session.set_main_offset(seconds);
    Ok(Json(json!({
        "success": true,
        "offset_seconds": seconds,
        "offset": format_offset(seconds),
        "match_report": report,
    })))
}

/// POST /api/gpx/tracks/:index/offset
pub async fn set_track_offset(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<OffsetRequest>,
) -> ApiResult<Json<Value>> {
    let seconds = parse_offset(&request.offset);
    let mut session = state.session.write().await;
    let report = session.set_track_offset(index, seconds)?;
    Ok(Json(json!({
        "success": true,
        "index": index,
        "offset_seconds": seconds,
        "match_report": report,
    })))
}

#[derive(Debug, Deserialize)]
pub struct RemoveTracksRequest {
    pub indices: Vec<usize>,
}

/// POST /api/gpx/remove
pub async fn remove_tracks(
    State(state): State<AppState>,
    Json(request): Json<RemoveTracksRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    let report = session.remove_tracks(&request.indices)?;
    Ok(Json(json!({
        "success": true,
        "tracks": session.tracks.tracks(),
        "match_report": report,
    })))
}

/// DELETE /api/gpx/tracks
pub async fn clear_tracks(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    let report = session.clear_tracks();
    Ok(Json(json!({ "success": true, "match_report": report })))
}
