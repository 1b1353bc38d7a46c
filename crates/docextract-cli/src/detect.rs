use std::path::Path;

use docextract_core::media::{DOCX, MSWORD, OCTET_STREAM, PDF};

/// Guess a declared media type from the file extension.
///
/// The server never sniffs content, and neither does this: it only stands in
/// for the `Content-Type` a browser would attach to the upload.
pub fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "pdf" => PDF,
        "docx" => DOCX,
        "doc" => MSWORD,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => OCTET_STREAM,
    }
}
