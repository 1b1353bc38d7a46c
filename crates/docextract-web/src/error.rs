use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use docextract_core::ExtractError;

use crate::models::ErrorResponse;

/// Every way a request can fail, each mapped to a status code.
///
/// The body is always `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("{message}")]
    BadUpload { status: StatusCode, message: String },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::BadUpload { status, .. } => *status,
            ApiError::Extract(ExtractError::UnsupportedType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ApiError::Extract(ExtractError::Parse { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let category = match &self {
            ApiError::Extract(e) => e.category().map(|c| c.to_string()),
            _ => None,
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), category, error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), category, error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
