//! HTTP layer for phototag: a thin axum mapping over the session operations

pub mod api;
pub mod state;

pub use api::build_router;
pub use state::AppState;
