// Re-export domain types for convenience
pub use docextract_core::{ExtractError, Extractor, ExtractorSettings, MediaCategory};

/// Build an [`Extractor`] with every backend compiled into this build.
///
/// - `pdf` feature → MuPDF text layer and page rendering
/// - `docx` feature → docx-rs paragraph reader
/// - `ocr` feature → Tesseract, for images and the PDF fallback
///
/// A category whose backend is missing still dispatches, but fails with
/// "... support not compiled in".
pub fn build_extractor(settings: &ExtractorSettings) -> Extractor {
    let extractor = Extractor::new(settings.clone());
    let extractor = attach_pdf(extractor);
    let extractor = attach_docx(extractor);
    let extractor = attach_ocr(extractor, settings);

    tracing::info!(
        strictness = ?settings.strictness,
        pdf_policy = ?settings.pdf_policy,
        ocr_languages = %settings.ocr.languages,
        ocr_dpi = settings.ocr.dpi,
        pdf_types = ?extractor.media_types().pdf_types(),
        backends = ?compiled_backends(),
        "extractor ready"
    );
    extractor
}

/// Names of the backends compiled into this build.
pub fn compiled_backends() -> Vec<&'static str> {
    let mut names = Vec::new();
    if cfg!(feature = "pdf") {
        names.push("mupdf");
    }
    if cfg!(feature = "docx") {
        names.push("docx-rs");
    }
    if cfg!(feature = "ocr") {
        names.push("tesseract");
    }
    names
}

#[cfg(feature = "pdf")]
fn attach_pdf(extractor: Extractor) -> Extractor {
    extractor.with_pdf_backend(docextract_pdf_mupdf::MupdfBackend::new())
}

#[cfg(not(feature = "pdf"))]
fn attach_pdf(extractor: Extractor) -> Extractor {
    extractor
}

#[cfg(feature = "docx")]
fn attach_docx(extractor: Extractor) -> Extractor {
    extractor.with_document_reader(docextract_docx::DocxReader::new())
}

#[cfg(not(feature = "docx"))]
fn attach_docx(extractor: Extractor) -> Extractor {
    extractor
}

#[cfg(feature = "ocr")]
fn attach_ocr(extractor: Extractor, settings: &ExtractorSettings) -> Extractor {
    let engine = match &settings.ocr.tessdata_dir {
        Some(dir) => docextract_ocr::TesseractEngine::new().with_tessdata_dir(dir),
        None => docextract_ocr::TesseractEngine::new(),
    };
    tracing::debug!(tessdata_dir = ?engine.tessdata_dir(), "tesseract engine configured");
    extractor.with_ocr_engine(engine)
}

#[cfg(not(feature = "ocr"))]
fn attach_ocr(extractor: Extractor, _settings: &ExtractorSettings) -> Extractor {
    extractor
}
