use serde::Serialize;

/// Successful extraction.
#[derive(Debug, Clone, Serialize)]
pub struct TextResponse {
    pub text: String,
}

/// Any failure; see [`crate::error::ApiError`] for status codes.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backends: Vec<&'static str>,
}
