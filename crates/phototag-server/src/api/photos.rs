//! Photo ledger endpoints

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use phototag_infra::thumbnails::render_thumbnail;
use phototag_types::{has_coordinates, PhotoFilter, PhotoMetadataUpdate, SortKey};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScanFolderRequest {
    pub folder_path: String,
    #[serde(default)]
    pub recursive: bool,
}

/// POST /api/scan-folder
pub async fn scan_folder(
    State(state): State<AppState>,
    Json(request): Json<ScanFolderRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    let count = session.scan_folder(std::path::Path::new(&request.folder_path), request.recursive)?;
    state.save_config(&session);
    state.thumbnails.lock().await.clear();

    let photos: Vec<&_> = session.ledger.photos(PhotoFilter::All);
    Ok(Json(json!({
        "success": true,
        "folder": request.folder_path,
        "count": count,
        "data": photos,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub filter_type: Option<String>,
}

/// GET /api/photos?filter_type=all|tagged|untagged
pub async fn list_photos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let filter = PhotoFilter::parse(params.filter_type.as_deref().unwrap_or("all"));
    let session = state.session.read().await;
    let photos = session.ledger.photos(filter);
    Ok(Json(json!({
        "success": true,
        "count": photos.len(),
        "data": photos,
    })))
}

/// GET /api/photos/:index
///
/// Like the photo list, but attempts a lazy track match for a photo that
/// has no track coordinates yet.
pub async fn photo_details(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    let needs_match = {
        let photo = session.ledger.photo(index)?;
        !has_coordinates(photo.gpx_latitude, photo.gpx_longitude)
    };
    if needs_match {
        session.match_photo(index)?;
    }
    let photo = session.ledger.photo(index)?;
    Ok(Json(json!({ "success": true, "photo": photo })))
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub tagged: bool,
}

/// POST /api/photos/:index/tag
pub async fn update_tag(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<TagRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session.ledger.update_tag(index, request.tagged)?;
    Ok(Json(json!({ "success": true, "index": index, "tagged": request.tagged })))
}

#[derive(Debug, Deserialize)]
pub struct BulkTagRequest {
    pub indices: Vec<usize>,
    pub tagged: bool,
}

/// POST /api/photos/bulk-tag
pub async fn bulk_tag(
    State(state): State<AppState>,
    Json(request): Json<BulkTagRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session.ledger.bulk_tag(&request.indices, request.tagged)?;
    Ok(Json(json!({ "success": true, "count": request.indices.len() })))
}

#[derive(Debug, Deserialize)]
pub struct ManualLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
}

/// POST /api/photos/:index/manual-location
pub async fn set_manual_location(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<ManualLocationRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session
        .ledger
        .set_manual_location(index, request.latitude, request.longitude, request.altitude)?;
    Ok(Json(json!({
        "success": true,
        "index": index,
        "latitude": request.latitude,
        "longitude": request.longitude,
    })))
}

/// DELETE /api/photos/:index/manual-location
pub async fn delete_manual_location(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session.ledger.delete_manual_location(index)?;
    Ok(Json(json!({ "success": true, "index": index })))
}

/// POST /api/photos/:index/metadata
pub async fn update_metadata(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(update): Json<PhotoMetadataUpdate>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session.ledger.update_metadata(index, update)?;
    Ok(Json(json!({ "success": true, "index": index })))
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub keywords: String,
}

/// POST /api/photos/keywords
pub async fn apply_keywords(
    State(state): State<AppState>,
    Json(request): Json<KeywordsRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session.ledger.apply_keywords_all(&request.keywords);
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/photos/keywords
pub async fn clear_keywords(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session.ledger.clear_keywords_all();
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort_by: SortKey,
}

/// POST /api/sort
pub async fn set_sort_order(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    session.set_sort_order(request.sort_by);
    state.save_config(&session);
    state.thumbnails.lock().await.clear();
    Ok(Json(json!({ "success": true, "sort_by": request.sort_by })))
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub format: Option<String>,
}

/// POST /api/rename
///
/// Applies the given filename format (or the configured one) to every photo
/// and resolves collisions.
pub async fn apply_filename_format(
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> ApiResult<Json<Value>> {
    let mut session = state.session.write().await;
    let pattern = request
        .format
        .unwrap_or_else(|| session.config.filename_format.clone());
    session.apply_filename_format(&pattern);
    state.save_config(&session);

    let photos = session.ledger.photos(PhotoFilter::All);
    let names: Vec<&str> = photos.iter().map(|p| p.new_name.as_str()).collect();
    Ok(Json(json!({ "success": true, "format": pattern, "names": names })))
}

#[derive(Debug, Deserialize)]
pub struct ThumbnailParams {
    #[serde(default)]
    pub size: Option<u32>,
}

/// GET /api/photo-thumbnail/:index?size=150
pub async fn thumbnail(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(params): Query<ThumbnailParams>,
) -> ApiResult<Response> {
    let session = state.session.read().await;
    let size = params.size.unwrap_or(session.config.thumbnail_size);
    let revision = session.ledger.revision();
    let source = session.ledger.photo(index)?.full_path.clone();
    drop(session);

    let mut cache = state.thumbnails.lock().await;
    let bytes = match cache.get(revision, index, size) {
        Some(cached) => cached,
        None => {
            let rendered = render_thumbnail(&source, size)?;
            cache.insert(revision, index, size, rendered.clone());
            rendered
        }
    };

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

/// GET /api/photo-image/:index
pub async fn full_image(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Response> {
    let session = state.session.read().await;
    let record = session.ledger.photo(index)?;
    let path = record.full_path.clone();
    let content_type = content_type_for(&record.filename);
    drop(session);

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(phototag_types::Error::from)?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

fn content_type_for(filename: &str) -> &'static str {
    match std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}
