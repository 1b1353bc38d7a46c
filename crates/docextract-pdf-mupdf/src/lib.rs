use mupdf::{Colorspace, Document, Matrix, Page, TextPageFlags};

use docextract_core::{BackendError, PdfBackend, PdfDocument, RasterImage};

/// PDF points per inch; MuPDF's identity matrix renders at 72 DPI.
const POINTS_PER_INCH: f32 = 72.0;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// The mupdf dependency (AGPL-3.0) lives only in this crate; non-PDF code
/// paths do not depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PdfDocument + 'a>, BackendError> {
        let document = Document::from_bytes(bytes, "application/pdf")
            .map_err(|e| BackendError::Open(e.to_string()))?;
        Ok(Box::new(MupdfDocument { document }))
    }
}

/// An opened MuPDF document.
pub struct MupdfDocument {
    document: Document,
}

impl MupdfDocument {
    fn load_page(&self, index: usize) -> Result<Page, BackendError> {
        let page_no = i32::try_from(index)
            .map_err(|_| BackendError::Extraction(format!("page index {index} out of range")))?;
        self.document
            .load_page(page_no)
            .map_err(|e| BackendError::Extraction(e.to_string()))
    }
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page = self.load_page(index)?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::Extraction(e.to_string()))?;

        // Block/line iteration matches PyMuPDF's get_text("text") layout
        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }
        Ok(page_text)
    }

    fn render_page(&self, index: usize, dpi: u32) -> Result<RasterImage, BackendError> {
        let page = self.load_page(index)?;
        let scale = dpi as f32 / POINTS_PER_INCH;
        let matrix = Matrix::new_scale(scale, scale);

        let pixmap = page
            .to_pixmap(&matrix, &Colorspace::device_rgb(), false, false)
            .map_err(|e| BackendError::Render(e.to_string()))?;

        pack_rgb_rows(pixmap.width(), pixmap.height(), pixmap.samples())
    }
}

/// Copy pixmap samples into tightly packed RGB rows.
///
/// MuPDF may pad rows, so the stride is derived from the sample buffer rather
/// than assumed to be `width * 3`.
fn pack_rgb_rows(width: u32, height: u32, samples: &[u8]) -> Result<RasterImage, BackendError> {
    if width == 0 || height == 0 {
        return Err(BackendError::Render("page rendered to an empty pixmap".into()));
    }

    let row_len = (width * RasterImage::BYTES_PER_PIXEL) as usize;
    let stride = samples.len() / height as usize;
    if stride < row_len {
        return Err(BackendError::Render(format!(
            "pixmap stride {stride} is shorter than an RGB row of {row_len} bytes"
        )));
    }

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in samples.chunks_exact(stride).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }

    Ok(RasterImage {
        width,
        height,
        pixels,
    })
}
