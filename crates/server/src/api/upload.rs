//! Multipart exam upload.

use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use exam_catalog_core::catalog::{CatalogEntry, CatalogStats};
use exam_catalog_core::upload::{StoredFile, UploadError, UploadForm, UploadSession};

use super::{api_error, ApiError};
use crate::metrics::{EXAM_FILE_SIZE, UPLOADS_TOTAL};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub exam: CatalogEntry,
    pub stats: CatalogStats,
}

/// POST /api/upload
///
/// Accepts one `examFile`, up to the configured number of `previews` and
/// the descriptive text fields. Files written for a failed upload are
/// removed again.
pub async fn upload_exam(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut session = UploadSession::new(state.upload_policy().clone(), state.uploads_dir());

    match receive(&state, &mut session, multipart).await {
        Ok((exam, stats)) => {
            UPLOADS_TOTAL.with_label_values(&["success"]).inc();
            if let Ok(file) = session.exam_file() {
                EXAM_FILE_SIZE
                    .with_label_values(&[&file.format_label()])
                    .observe(file.size as f64);
            }
            info!(id = %exam.id, name = %exam.name, files = session.stored().len(), "Exam uploaded");
            Ok(Json(UploadResponse {
                success: true,
                message: "Exam uploaded successfully".to_string(),
                exam,
                stats,
            }))
        }
        Err(e) => {
            warn!(error = %e, "Upload rejected");
            UPLOADS_TOTAL.with_label_values(&[e.metric_label()]).inc();
            session.cleanup().await;
            let status =
                StatusCode::from_u16(e.status_hint()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err(api_error(status, e.to_string()))
        }
    }
}

async fn receive(
    state: &AppState,
    session: &mut UploadSession,
    mut multipart: Multipart,
) -> Result<(CatalogEntry, CatalogStats), UploadError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or("").to_string();
        match field.file_name().map(|s| s.to_string()) {
            Some(file_name) => {
                let stored = store_file(session, &name, &file_name, field).await?;
                session.accept(stored);
            }
            None => {
                let value = field.text().await.map_err(malformed)?;
                if !form.set(&name, value) {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
            }
        }
    }

    let exam = session.exam_file()?;
    let previews = session.previews();
    let entry = form.into_entry(exam, &previews, Utc::now());
    let stats = state.metadata().insert(entry.clone())?;
    Ok((entry, stats))
}

async fn store_file(
    session: &mut UploadSession,
    field_name: &str,
    file_name: &str,
    mut field: Field<'_>,
) -> Result<StoredFile, UploadError> {
    let mut pending = session.open_file(field_name, file_name).await?;
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        pending.write_chunk(&chunk).await?;
    }
    pending.finish().await
}

fn malformed(err: axum::extract::multipart::MultipartError) -> UploadError {
    UploadError::Malformed(err.body_text())
}
