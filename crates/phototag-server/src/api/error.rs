//! Error-to-status mapping for the HTTP layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use phototag_types::Error;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper turning core errors into HTTP responses.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Parse(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::ExternalService(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
