use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const PDF: &str = "application/pdf";
pub const OCTET_STREAM: &str = "application/octet-stream";
pub const X_PDF: &str = "application/x-pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MSWORD: &str = "application/msword";
pub const IMAGE_PREFIX: &str = "image/";

/// The extraction strategy a declared media type resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Pdf,
    Document,
    Image,
}

impl MediaCategory {
    /// Prefix used in failure messages for this category.
    pub fn failure_label(self) -> &'static str {
        match self {
            MediaCategory::Pdf => "PDF parsing failed",
            MediaCategory::Document => "DOC/DOCX parsing failed",
            MediaCategory::Image => "Image OCR failed",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaCategory::Pdf => "pdf",
            MediaCategory::Document => "document",
            MediaCategory::Image => "image",
        };
        f.write_str(name)
    }
}

/// Which preset of accepted PDF labels to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Only `application/pdf` is routed to the PDF path.
    Strict,
    /// Generic binary and `application/x-pdf` are routed to the PDF path too.
    #[default]
    Permissive,
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "permissive" => Ok(Strictness::Permissive),
            other => Err(format!(
                "unknown strictness '{other}' (expected 'strict' or 'permissive')"
            )),
        }
    }
}

/// Accepted declared media types, as data.
///
/// Rules are checked in order (PDF labels, document labels, image prefixes)
/// and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeTable {
    pdf: Vec<String>,
    document: Vec<String>,
    image_prefixes: Vec<String>,
}

impl MediaTypeTable {
    pub fn strict() -> Self {
        Self {
            pdf: vec![PDF.to_string()],
            document: vec![DOCX.to_string(), MSWORD.to_string()],
            image_prefixes: vec![IMAGE_PREFIX.to_string()],
        }
    }

    pub fn permissive() -> Self {
        Self::strict()
            .with_pdf_type(OCTET_STREAM)
            .with_pdf_type(X_PDF)
    }

    pub fn for_strictness(strictness: Strictness) -> Self {
        match strictness {
            Strictness::Strict => Self::strict(),
            Strictness::Permissive => Self::permissive(),
        }
    }

    /// Accept an additional label on the PDF path.
    pub fn with_pdf_type(mut self, media_type: &str) -> Self {
        let media_type = normalize(media_type);
        if !self.pdf.contains(&media_type) {
            self.pdf.push(media_type);
        }
        self
    }

    pub fn pdf_types(&self) -> &[String] {
        &self.pdf
    }

    /// Resolve a declared media type to a category, or `None` if unsupported.
    pub fn classify(&self, declared: &str) -> Option<MediaCategory> {
        let media_type = normalize(declared);
        if media_type.is_empty() {
            return None;
        }

        if self.pdf.iter().any(|t| *t == media_type) {
            Some(MediaCategory::Pdf)
        } else if self.document.iter().any(|t| *t == media_type) {
            Some(MediaCategory::Document)
        } else if self
            .image_prefixes
            .iter()
            .any(|p| media_type.starts_with(p.as_str()))
        {
            Some(MediaCategory::Image)
        } else {
            None
        }
    }
}

impl Default for MediaTypeTable {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Lowercase, trim, and drop any `; param=value` suffix.
pub fn normalize(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_only_accepts_canonical_pdf() {
        let table = MediaTypeTable::strict();
        assert_eq!(table.classify(PDF), Some(MediaCategory::Pdf));
        assert_eq!(table.classify(OCTET_STREAM), None);
        assert_eq!(table.classify(X_PDF), None);
    }

    #[test]
    fn permissive_accepts_binary_and_alternate_pdf_labels() {
        let table = MediaTypeTable::permissive();
        assert_eq!(table.classify(PDF), Some(MediaCategory::Pdf));
        assert_eq!(table.classify(OCTET_STREAM), Some(MediaCategory::Pdf));
        assert_eq!(table.classify(X_PDF), Some(MediaCategory::Pdf));
    }

    #[test]
    fn word_labels_are_documents_in_both_presets() {
        for table in [MediaTypeTable::strict(), MediaTypeTable::permissive()] {
            assert_eq!(table.classify(DOCX), Some(MediaCategory::Document));
            assert_eq!(table.classify(MSWORD), Some(MediaCategory::Document));
        }
    }

    #[test]
    fn image_prefix_matches_any_subtype() {
        let table = MediaTypeTable::strict();
        assert_eq!(table.classify("image/png"), Some(MediaCategory::Image));
        assert_eq!(table.classify("image/jpeg"), Some(MediaCategory::Image));
        assert_eq!(table.classify("image/tiff"), Some(MediaCategory::Image));
        // Prefix must match at the start, not anywhere.
        assert_eq!(table.classify("application/image/png"), None);
    }

    #[test]
    fn unrecognized_types_are_unsupported() {
        let table = MediaTypeTable::permissive();
        assert_eq!(table.classify("application/zip"), None);
        assert_eq!(table.classify("text/plain"), None);
        assert_eq!(table.classify(""), None);
        assert_eq!(table.classify("   "), None);
    }

    #[test]
    fn parameters_and_case_are_ignored() {
        let table = MediaTypeTable::strict();
        assert_eq!(
            table.classify("Application/PDF; charset=binary"),
            Some(MediaCategory::Pdf)
        );
        assert_eq!(table.classify(" IMAGE/PNG "), Some(MediaCategory::Image));
    }

    #[test]
    fn extra_pdf_label_is_not_duplicated() {
        let table = MediaTypeTable::strict()
            .with_pdf_type("application/x-pdf")
            .with_pdf_type("APPLICATION/X-PDF");
        assert_eq!(table.pdf_types(), &[PDF.to_string(), X_PDF.to_string()]);
    }

    #[test]
    fn strictness_parses_from_str() {
        assert_eq!("strict".parse::<Strictness>(), Ok(Strictness::Strict));
        assert_eq!(" Permissive ".parse::<Strictness>(), Ok(Strictness::Permissive));
        assert!("lenient".parse::<Strictness>().is_err());
    }

    #[test]
    fn failure_labels_name_the_category() {
        assert_eq!(MediaCategory::Pdf.failure_label(), "PDF parsing failed");
        assert_eq!(
            MediaCategory::Document.failure_label(),
            "DOC/DOCX parsing failed"
        );
        assert_eq!(MediaCategory::Image.failure_label(), "Image OCR failed");
    }
}
