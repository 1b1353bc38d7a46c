use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};

use docextract_core::media::OCTET_STREAM;

use crate::error::ApiError;

/// Name of the preferred form field carrying the upload.
pub const FILE_FIELD: &str = "file";

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: Option<String>,
    /// Declared by the client in the part's `Content-Type`; never sniffed.
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Pull the uploaded file out of a multipart form.
///
/// The `file` field wins; otherwise the first part that carries a file name
/// is used. Every other part is drained and ignored.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut from_named_field = false;

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let is_named = field.name() == Some(FILE_FIELD);
        let has_filename = field.file_name().is_some();

        if is_named && !from_named_field {
            file = Some(read_file(field).await?);
            from_named_field = true;
        } else if file.is_none() && has_filename {
            file = Some(read_file(field).await?);
        } else {
            // Drain unknown fields
            field.bytes().await.map_err(bad_upload)?;
        }
    }

    file.ok_or(ApiError::MissingFile)
}

async fn read_file(field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let filename = field.file_name().map(str::to_string);
    let media_type = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| OCTET_STREAM.to_string());
    let data = field.bytes().await.map_err(bad_upload)?.to_vec();

    Ok(UploadedFile {
        filename,
        media_type,
        data,
    })
}

fn bad_upload(e: MultipartError) -> ApiError {
    ApiError::BadUpload {
        status: e.status(),
        message: format!("Failed to read upload: {}", e.body_text()),
    }
}
