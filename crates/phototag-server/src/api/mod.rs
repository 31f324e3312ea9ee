//! HTTP API handlers

pub mod config;
pub mod error;
pub mod export;
pub mod health;
pub mod photos;
pub mod positions;
pub mod services;
pub mod tracks;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/scan-folder", post(photos::scan_folder))
        .route("/api/photos", get(photos::list_photos))
        .route("/api/photos/bulk-tag", post(photos::bulk_tag))
        .route(
            "/api/photos/keywords",
            post(photos::apply_keywords).delete(photos::clear_keywords),
        )
        .route("/api/photos/:index", get(photos::photo_details))
        .route("/api/photos/:index/tag", post(photos::update_tag))
        .route(
            "/api/photos/:index/manual-location",
            post(photos::set_manual_location).delete(photos::delete_manual_location),
        )
        .route("/api/photos/:index/metadata", post(photos::update_metadata))
        .route("/api/photo-thumbnail/:index", get(photos::thumbnail))
        .route("/api/photo-image/:index", get(photos::full_image))
        .route("/api/sort", post(photos::set_sort_order))
        .route("/api/rename", post(photos::apply_filename_format))
        .route("/api/gpx/upload", post(tracks::upload_tracks))
        .route(
            "/api/gpx/tracks",
            get(tracks::list_tracks).delete(tracks::clear_tracks),
        )
        .route("/api/gpx/tracks/:index/offset", post(tracks::set_track_offset))
        .route("/api/gpx/offset", post(tracks::set_main_offset))
        .route("/api/gpx/remove", post(tracks::remove_tracks))
        .route("/api/positions/upload", post(positions::upload_positions))
        .route("/api/positions", get(positions::list_positions))
        .route("/api/positions/remove", post(positions::remove_positions))
        .route("/api/geocode", get(services::reverse_geocode))
        .route("/api/elevation", get(services::elevation))
        .route("/api/export", post(export::export_photos))
        .route(
            "/api/config",
            get(config::get_config).post(config::update_config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
