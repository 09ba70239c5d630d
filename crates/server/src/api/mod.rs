pub mod exams;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod upload;

pub use routes::create_router;

use axum::{http::StatusCode, Json};
use serde::Serialize;

use exam_catalog_core::CatalogError;

/// Body of every failed API call.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Map a catalog error to its HTTP status.
pub(crate) fn catalog_error(err: CatalogError) -> ApiError {
    match err {
        CatalogError::NotFound(id) => {
            api_error(StatusCode::NOT_FOUND, format!("Exam not found: {}", id))
        }
        other => {
            tracing::error!(error = %other, "Catalog operation failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}
