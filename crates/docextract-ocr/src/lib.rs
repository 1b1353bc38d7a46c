use std::path::{Path, PathBuf};

use tesseract::Tesseract;

use docextract_core::{BackendError, OcrEngine, RasterImage};

/// Tesseract-based implementation of [`OcrEngine`].
///
/// A fresh Tesseract instance is initialised for every call; instances are
/// not shared between requests.
#[derive(Debug, Default, Clone)]
pub struct TesseractEngine {
    /// Directory holding `*.traineddata`. `None` lets Tesseract use
    /// `TESSDATA_PREFIX` or its compiled-in default.
    tessdata_dir: Option<PathBuf>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    pub fn tessdata_dir(&self) -> Option<&Path> {
        self.tessdata_dir.as_deref()
    }

    fn init(&self, languages: &str) -> Result<Tesseract, BackendError> {
        let datapath = match &self.tessdata_dir {
            Some(dir) => Some(
                dir.to_str()
                    .ok_or_else(|| BackendError::Ocr("invalid tessdata path encoding".into()))?,
            ),
            None => None,
        };
        Tesseract::new(datapath, Some(languages)).map_err(|e| BackendError::Ocr(e.to_string()))
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize_bytes(&self, bytes: &[u8], languages: &str) -> Result<String, BackendError> {
        let image = decode_image(bytes)?;
        self.recognize_raster(&image, languages)
    }

    fn recognize_raster(
        &self,
        image: &RasterImage,
        languages: &str,
    ) -> Result<String, BackendError> {
        let (width, height, bytes_per_line) = frame_dimensions(image)?;
        tracing::debug!(width, height, languages, "running OCR");

        self.init(languages)?
            .set_frame(
                &image.pixels,
                width,
                height,
                RasterImage::BYTES_PER_PIXEL as i32,
                bytes_per_line,
            )
            .map_err(|e| BackendError::Ocr(e.to_string()))?
            .recognize()
            .map_err(|e| BackendError::Ocr(e.to_string()))?
            .get_text()
            .map_err(|e| BackendError::Ocr(e.to_string()))
    }
}

/// Decode an encoded image (PNG, JPEG, TIFF, BMP, GIF, WebP) into RGB pixels.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, BackendError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(RasterImage {
        width,
        height,
        pixels: rgb.into_raw(),
    })
}

fn frame_dimensions(image: &RasterImage) -> Result<(i32, i32, i32), BackendError> {
    let expected = image.bytes_per_line() as usize * image.height as usize;
    if image.width == 0 || image.height == 0 || image.pixels.len() != expected {
        return Err(BackendError::Ocr(format!(
            "malformed {}x{} frame with {} bytes",
            image.width,
            image.height,
            image.pixels.len()
        )));
    }

    let to_i32 = |v: u32| {
        i32::try_from(v).map_err(|_| BackendError::Ocr(format!("frame dimension {v} too large")))
    };
    Ok((
        to_i32(image.width)?,
        to_i32(image.height)?,
        to_i32(image.bytes_per_line())?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn png_decodes_to_packed_rgb() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(2, 1, Rgb([200, 210, 220]));

        let decoded = decode_image(&encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.pixels.len(), 3 * 2 * 3);
        assert_eq!(&decoded.pixels[0..3], &[10, 20, 30]);
        assert_eq!(&decoded.pixels[15..18], &[200, 210, 220]);
    }

    #[test]
    fn grayscale_is_expanded_to_rgb() {
        let gray = image::GrayImage::from_pixel(2, 2, image::Luma([128]));
        let mut buf = Cursor::new(Vec::new());
        gray.write_to(&mut buf, ImageFormat::Png).unwrap();

        let decoded = decode_image(&buf.into_inner()).unwrap();
        assert_eq!(decoded.pixels, vec![128; 12]);
    }

    #[test]
    fn garbage_fails_to_decode() {
        let err = decode_image(b"this is not an image").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn frame_dimensions_check_buffer_length() {
        let ok = RasterImage {
            width: 4,
            height: 2,
            pixels: vec![0; 24],
        };
        assert_eq!(frame_dimensions(&ok).unwrap(), (4, 2, 12));

        let short = RasterImage {
            width: 4,
            height: 2,
            pixels: vec![0; 23],
        };
        assert!(frame_dimensions(&short).is_err());

        let empty = RasterImage {
            width: 0,
            height: 0,
            pixels: vec![],
        };
        assert!(frame_dimensions(&empty).is_err());
    }

    #[test]
    fn tessdata_dir_is_recorded() {
        assert!(TesseractEngine::new().tessdata_dir().is_none());
        let engine = TesseractEngine::new().with_tessdata_dir("/usr/share/tessdata");
        assert_eq!(engine.tessdata_dir(), Some(Path::new("/usr/share/tessdata")));
    }

    #[test]
    fn undecodable_bytes_fail_before_tesseract_init() {
        // Decode runs first, so this holds even without tessdata installed.
        let engine = TesseractEngine::new().with_tessdata_dir("/nonexistent/tessdata");
        let err = engine.recognize_bytes(b"GIF89a-truncated", "fra+eng").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
