use axum::{
    extract::{OriginalUri, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use exam_catalog_core::config::QuickFilterConfig;

use super::{api_error, ApiError};
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Settings the catalog page needs at startup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub page_size: usize,
    pub favorites_key: String,
    pub quick_filters: Vec<QuickFilterConfig>,
    pub available_grades: Vec<String>,
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ClientConfigResponse> {
    let browse = state.browse_config();
    Json(ClientConfigResponse {
        page_size: browse.page_size,
        favorites_key: browse.favorites_key.clone(),
        quick_filters: browse.quick_filters.clone(),
        available_grades: browse.available_grades.clone(),
    })
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}

/// Fallback for unknown `/api` routes.
pub async fn api_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        format!("Route {} {} not found", method, uri),
    )
}
