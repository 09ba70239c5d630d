use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::{exams, handlers, middleware::metrics_middleware, upload};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.upload_policy().max_request_bytes();

    // API routes
    let api_routes = Router::new()
        .route("/config", get(handlers::get_config))
        .route("/stats", get(exams::get_stats))
        // Exams
        .route("/exams", get(exams::list_exams))
        .route("/exams/search/{keyword}", get(exams::search_exams))
        .route("/exams/{id}", get(exams::get_exam))
        .route("/exams/{id}/view", put(exams::record_view))
        .route("/exams/{id}/download", put(exams::record_download))
        .route("/subjects", get(exams::list_subjects))
        // Upload
        .route(
            "/upload",
            post(upload::upload_exam).layer(DefaultBodyLimit::max(body_limit)),
        )
        .fallback(handlers::api_not_found);

    // Catalog page and uploaded files are served straight from disk
    let uploads = ServeDir::new(state.uploads_dir());
    let site = ServeDir::new(state.site_dir());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", api_routes)
        .nest_service("/uploads", uploads)
        .fallback_service(site)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
