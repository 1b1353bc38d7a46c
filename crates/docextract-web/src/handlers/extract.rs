use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};

use crate::error::ApiError;
use crate::models::TextResponse;
use crate::state::AppState;
use crate::upload::{self, UploadedFile};

/// `POST /extract` (and its `/extract_pdf_text` alias).
pub async fn extract(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    let multipart = multipart.map_err(|rejection| ApiError::BadUpload {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    let file = upload::parse_multipart(multipart).await?;

    tracing::info!(
        filename = file.filename.as_deref().unwrap_or("-"),
        media_type = %file.media_type,
        bytes = file.data.len(),
        "extraction requested"
    );

    let started = Instant::now();
    let text = extract_blocking(&state, file).await?;

    tracing::info!(
        chars = text.chars().count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "extraction complete"
    );
    Ok(Json(TextResponse { text }))
}

/// Run the extractor on the blocking pool (MuPDF, docx-rs and Tesseract are
/// all synchronous).
async fn extract_blocking(state: &AppState, file: UploadedFile) -> Result<String, ApiError> {
    let extractor = Arc::clone(&state.extractor);
    tokio::task::spawn_blocking(move || extractor.extract(&file.data, &file.media_type))
        .await
        .map_err(|e| ApiError::Internal(format!("Extraction task failed: {}", e)))?
        .map_err(ApiError::from)
}
