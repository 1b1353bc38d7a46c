use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("failed to render page: {0}")]
    Render(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("{0} support not compiled in")]
    Unavailable(&'static str),
}

/// A decoded raster image: packed 8-bit RGB, `width * 3` bytes per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub const BYTES_PER_PIXEL: u32 = 3;

    pub fn bytes_per_line(&self) -> u32 {
        self.width * Self::BYTES_PER_PIXEL
    }
}

/// Trait for PDF backends.
///
/// The dispatcher only needs random access to pages: the text layer of a
/// page, and a rasterized rendering of the same page for OCR fallback.
pub trait PdfBackend: Send + Sync {
    /// Open an in-memory PDF.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PdfDocument + 'a>, BackendError>;
}

/// An opened PDF document. Dropped at the end of the request.
pub trait PdfDocument {
    fn page_count(&self) -> Result<usize, BackendError>;

    /// Text layer of the page at `index` (0-based). Empty when the page has
    /// no embedded text.
    fn page_text(&self, index: usize) -> Result<String, BackendError>;

    /// Render the page at `index` to RGB pixels at `dpi` dots per inch.
    fn render_page(&self, index: usize, dpi: u32) -> Result<RasterImage, BackendError>;
}

/// Trait for word-processing document readers.
pub trait DocumentReader: Send + Sync {
    /// Paragraph texts in document order.
    fn paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, BackendError>;
}

/// Trait for OCR engines.
///
/// `languages` uses the engine's own syntax (for Tesseract, `fra+eng`).
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an encoded image file (PNG, JPEG, TIFF, ...).
    fn recognize_bytes(&self, bytes: &[u8], languages: &str) -> Result<String, BackendError>;

    /// Recognize text in already-decoded pixels.
    fn recognize_raster(&self, image: &RasterImage, languages: &str)
    -> Result<String, BackendError>;
}
