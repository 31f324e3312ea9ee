//! Geocoding and elevation lookup endpoints
//!
//! Provider failures never surface as HTTP errors: the response carries a
//! null payload instead.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    pub latitude: f64,
    pub longitude: f64,
}

/// GET /api/geocode?latitude=..&longitude=..
pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> ApiResult<Json<Value>> {
    let location = state
        .geocoder
        .reverse_geocode(params.latitude, params.longitude)
        .await;
    Ok(Json(json!({ "success": true, "location": location })))
}

/// GET /api/elevation?latitude=..&longitude=..
pub async fn elevation(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> ApiResult<Json<Value>> {
    let provider = {
        let session = state.session.read().await;
        session.config.elevation_service.clone()
    };
    let elevation = state
        .elevation
        .lookup(params.latitude, params.longitude, &provider)
        .await;
    Ok(Json(json!({ "success": true, "elevation": elevation })))
}
