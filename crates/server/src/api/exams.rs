//! Exam catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use exam_catalog_core::catalog::{CatalogEntry, SubjectCount};
use exam_catalog_core::metadata::{
    CounterField, ExamPage, ExamQuery, SearchResults, StatsSummary, DEFAULT_SEARCH_LIMIT,
};

use super::{catalog_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: StatsSummary,
}

#[derive(Debug, Serialize)]
pub struct ExamListResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: ExamPage,
}

#[derive(Debug, Serialize)]
pub struct ExamResponse {
    pub success: bool,
    pub exam: CatalogEntry,
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(flatten)]
    pub results: SearchResults,
}

#[derive(Debug, Serialize)]
pub struct SubjectsResponse {
    pub success: bool,
    pub subjects: Vec<SubjectCount>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/stats
///
/// Stored statistics and the five most recent uploads.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let summary = state.metadata().summary().map_err(catalog_error)?;
    Ok(Json(StatsResponse {
        success: true,
        summary,
    }))
}

/// GET /api/exams
///
/// Filtered, paginated listing (`page`, `limit`, `subject`, `grade`,
/// `year`, `search`).
pub async fn list_exams(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExamQuery>,
) -> Result<Json<ExamListResponse>, ApiError> {
    debug!(?query, "Listing exams");
    let page = state.metadata().query(&query).map_err(catalog_error)?;
    Ok(Json(ExamListResponse {
        success: true,
        page,
    }))
}

/// GET /api/exams/{id}
///
/// Get one exam. Counts as a view.
pub async fn get_exam(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = state
        .metadata()
        .get_and_count_view(&id)
        .map_err(catalog_error)?;
    Ok(Json(ExamResponse {
        success: true,
        exam,
    }))
}

/// PUT /api/exams/{id}/view
pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CounterResponse>, ApiError> {
    let views = state
        .metadata()
        .increment(&id, CounterField::View)
        .map_err(catalog_error)?;
    Ok(Json(CounterResponse {
        success: true,
        message: "View count updated".to_string(),
        views: Some(views),
        downloads: None,
    }))
}

/// PUT /api/exams/{id}/download
pub async fn record_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CounterResponse>, ApiError> {
    let downloads = state
        .metadata()
        .increment(&id, CounterField::Download)
        .map_err(catalog_error)?;
    Ok(Json(CounterResponse {
        success: true,
        message: "Download count updated".to_string(),
        views: None,
        downloads: Some(downloads),
    }))
}

/// GET /api/exams/search/{keyword}
///
/// Up to 50 entries whose name, description, tags or knowledge points
/// contain the keyword.
pub async fn search_exams(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state
        .metadata()
        .search(&keyword, DEFAULT_SEARCH_LIMIT)
        .map_err(catalog_error)?;
    Ok(Json(SearchResponse {
        success: true,
        results,
    }))
}

/// GET /api/subjects
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubjectsResponse>, ApiError> {
    let subjects = state.metadata().subjects().map_err(catalog_error)?;
    Ok(Json(SubjectsResponse {
        success: true,
        subjects,
    }))
}
