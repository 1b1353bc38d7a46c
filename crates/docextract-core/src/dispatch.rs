use crate::backend::{BackendError, DocumentReader, OcrEngine, PdfBackend, PdfDocument};
use crate::media::{MediaCategory, MediaTypeTable};
use crate::{ExtractError, ExtractorSettings, OcrSettings, PdfPolicy};

/// Media-type dispatcher over the PDF, document and OCR backends.
///
/// Immutable once built; share it behind an `Arc`. Backends are optional so
/// that builds without a native library still serve the other categories.
pub struct Extractor {
    table: MediaTypeTable,
    pdf_policy: PdfPolicy,
    ocr: OcrSettings,
    pdf_backend: Option<Box<dyn PdfBackend>>,
    document_reader: Option<Box<dyn DocumentReader>>,
    ocr_engine: Option<Box<dyn OcrEngine>>,
}

impl Extractor {
    /// An extractor with no backends attached.
    pub fn new(settings: ExtractorSettings) -> Self {
        Self {
            table: MediaTypeTable::for_strictness(settings.strictness),
            pdf_policy: settings.pdf_policy,
            ocr: settings.ocr,
            pdf_backend: None,
            document_reader: None,
            ocr_engine: None,
        }
    }

    /// Replace the media-type table derived from the settings.
    pub fn with_media_types(mut self, table: MediaTypeTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_pdf_backend(mut self, backend: impl PdfBackend + 'static) -> Self {
        self.pdf_backend = Some(Box::new(backend));
        self
    }

    pub fn with_document_reader(mut self, reader: impl DocumentReader + 'static) -> Self {
        self.document_reader = Some(Box::new(reader));
        self
    }

    pub fn with_ocr_engine(mut self, engine: impl OcrEngine + 'static) -> Self {
        self.ocr_engine = Some(Box::new(engine));
        self
    }

    pub fn media_types(&self) -> &MediaTypeTable {
        &self.table
    }

    pub fn pdf_policy(&self) -> PdfPolicy {
        self.pdf_policy
    }

    pub fn ocr_settings(&self) -> &OcrSettings {
        &self.ocr
    }

    /// Extract plain text from `content` according to `declared_type`.
    ///
    /// This is the only place backend errors are turned into
    /// [`ExtractError::Parse`]; an unsupported type returns before any
    /// backend is touched.
    pub fn extract(&self, content: &[u8], declared_type: &str) -> Result<String, ExtractError> {
        let category = self
            .table
            .classify(declared_type)
            .ok_or_else(|| ExtractError::UnsupportedType(declared_type.trim().to_string()))?;

        tracing::debug!(
            media_type = declared_type,
            %category,
            bytes = content.len(),
            "dispatching extraction"
        );

        let result = match category {
            MediaCategory::Pdf => self.extract_pdf(content),
            MediaCategory::Document => self.extract_document(content),
            MediaCategory::Image => self.extract_image(content),
        };

        result.map_err(|e| ExtractError::Parse {
            category,
            detail: e.to_string(),
        })
    }

    fn extract_pdf(&self, content: &[u8]) -> Result<String, BackendError> {
        let backend = self
            .pdf_backend
            .as_deref()
            .ok_or(BackendError::Unavailable("PDF"))?;

        let document = backend.open(content)?;
        let page_count = document.page_count()?;

        let mut text = String::new();
        let mut ocr_pages = 0usize;

        for index in 0..page_count {
            let page_text = document.page_text(index)?;

            match self.pdf_policy {
                PdfPolicy::Basic => text.push_str(&page_text),
                PdfPolicy::FallbackAware => {
                    if page_text.trim().is_empty() {
                        tracing::debug!(
                            page = index + 1,
                            dpi = self.ocr.dpi,
                            "page has no text layer, falling back to OCR"
                        );
                        text.push_str(&self.ocr_pdf_page(document.as_ref(), index)?);
                        ocr_pages += 1;
                    } else {
                        text.push_str(&page_text);
                    }
                    text.push('\n');
                }
            }
        }

        tracing::debug!(pages = page_count, ocr_pages, "PDF extraction complete");
        Ok(text)
    }

    fn ocr_pdf_page(&self, document: &dyn PdfDocument, index: usize) -> Result<String, BackendError> {
        let engine = self
            .ocr_engine
            .as_deref()
            .ok_or(BackendError::Unavailable("OCR"))?;
        let image = document.render_page(index, self.ocr.dpi)?;
        engine.recognize_raster(&image, &self.ocr.languages)
    }

    fn extract_document(&self, content: &[u8]) -> Result<String, BackendError> {
        let reader = self
            .document_reader
            .as_deref()
            .ok_or(BackendError::Unavailable("DOC/DOCX"))?;

        let mut text = String::new();
        for paragraph in reader.paragraphs(content)? {
            text.push_str(&paragraph);
            text.push('\n');
        }
        Ok(text)
    }

    fn extract_image(&self, content: &[u8]) -> Result<String, BackendError> {
        let engine = self
            .ocr_engine
            .as_deref()
            .ok_or(BackendError::Unavailable("OCR"))?;
        engine.recognize_bytes(content, &self.ocr.languages)
    }
}
