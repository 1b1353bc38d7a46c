use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod dispatch;
pub mod media;

// Re-export for convenience
pub use backend::{BackendError, DocumentReader, OcrEngine, PdfBackend, PdfDocument, RasterImage};
pub use dispatch::Extractor;
pub use media::{MediaCategory, MediaTypeTable, Strictness};

pub const DEFAULT_OCR_LANGUAGES: &str = "fra+eng";
pub const DEFAULT_OCR_DPI: u32 = 300;

/// Why an extraction did not produce text.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The declared media type matched no extraction strategy.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    /// The selected backend rejected the content.
    #[error("{}: {detail}", category.failure_label())]
    Parse {
        category: MediaCategory,
        detail: String,
    },
}

impl ExtractError {
    pub fn category(&self) -> Option<MediaCategory> {
        match self {
            ExtractError::UnsupportedType(_) => None,
            ExtractError::Parse { category, .. } => Some(*category),
        }
    }
}

/// How PDF pages without a text layer are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfPolicy {
    /// Concatenate the text layer of every page, nothing else.
    Basic,
    /// OCR any page whose text layer is empty after trimming.
    #[default]
    #[serde(alias = "fallback")]
    FallbackAware,
}

impl FromStr for PdfPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(PdfPolicy::Basic),
            "fallback" | "fallback-aware" => Ok(PdfPolicy::FallbackAware),
            other => Err(format!(
                "unknown PDF policy '{other}' (expected 'basic' or 'fallback-aware')"
            )),
        }
    }
}

/// OCR parameters shared by the image path and the PDF fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// Tesseract language string, e.g. `fra+eng`.
    pub languages: String,
    /// Resolution used when rasterizing PDF pages for OCR.
    pub dpi: u32,
    /// Directory holding `*.traineddata`. `None` uses the engine default.
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            languages: DEFAULT_OCR_LANGUAGES.to_string(),
            dpi: DEFAULT_OCR_DPI,
            tessdata_dir: None,
        }
    }
}

/// Everything needed to build an [`Extractor`], minus the backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorSettings {
    pub strictness: Strictness,
    pub pdf_policy: PdfPolicy,
    pub ocr: OcrSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_echoes_type() {
        let err = ExtractError::UnsupportedType("application/zip".into());
        assert_eq!(err.to_string(), "Unsupported file type: application/zip");
        assert_eq!(err.category(), None);
    }

    #[test]
    fn parse_message_starts_with_category_label() {
        let err = ExtractError::Parse {
            category: MediaCategory::Document,
            detail: "failed to open document: not a zip".into(),
        };
        assert_eq!(
            err.to_string(),
            "DOC/DOCX parsing failed: failed to open document: not a zip"
        );
        assert_eq!(err.category(), Some(MediaCategory::Document));
    }

    #[test]
    fn pdf_policy_accepts_short_alias() {
        assert_eq!("fallback".parse::<PdfPolicy>(), Ok(PdfPolicy::FallbackAware));
        assert_eq!("BASIC".parse::<PdfPolicy>(), Ok(PdfPolicy::Basic));
        assert!("ocr-only".parse::<PdfPolicy>().is_err());
    }

    #[test]
    fn default_settings_match_service_defaults() {
        let settings = ExtractorSettings::default();
        assert_eq!(settings.strictness, Strictness::Permissive);
        assert_eq!(settings.pdf_policy, PdfPolicy::FallbackAware);
        assert_eq!(settings.ocr.languages, "fra+eng");
        assert_eq!(settings.ocr.dpi, 300);
        assert!(settings.ocr.tessdata_dir.is_none());
    }
}
