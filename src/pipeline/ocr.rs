//! Text extractor adapter: raster image → transcription via tesseract.
//!
//! The image is decoded with the `image` crate first, so a corrupt or
//! non-image file surfaces as [`AnalysisError::ImageDecodeError`] instead of
//! an opaque tesseract failure. A blank page is not an error: tesseract
//! simply prints nothing and the transcription is empty.

use crate::error::AnalysisError;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Converts a raster image into plain text.
pub trait TextExtractor: Send + Sync {
    /// Transcribe the image at `image`. May return an empty string.
    ///
    /// # Errors
    /// [`AnalysisError::ImageDecodeError`] when the image cannot be opened.
    fn extract(&self, image: &Path) -> Result<String, AnalysisError>;
}

/// Default extractor shelling out to the tesseract CLI.
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    cmd: String,
    language: String,
}

impl TesseractExtractor {
    pub fn new(cmd: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            language: language.into(),
        }
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl TextExtractor for TesseractExtractor {
    fn extract(&self, image: &Path) -> Result<String, AnalysisError> {
        check_image(image)?;

        let output = Command::new(&self.cmd)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| AnalysisError::OcrEngineUnavailable {
                cmd: self.cmd.clone(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("tesseract exited with {} on {}", output.status, image.display());
            return Err(AnalysisError::OcrFailed {
                path: image.to_path_buf(),
                detail: stderr.trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR {} → {} chars", image.display(), text.chars().count());
        Ok(text)
    }
}

/// Open and decode `path`, discarding the pixels.
pub fn check_image(path: &Path) -> Result<(), AnalysisError> {
    let decode_err = |detail: String| AnalysisError::ImageDecodeError {
        path: path.to_path_buf(),
        detail,
    };
    image::ImageReader::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn missing_image_is_a_decode_error() {
        let err = check_image(Path::new("/no/such/scan.png")).unwrap_err();
        assert!(matches!(err, AnalysisError::ImageDecodeError { .. }));
    }

    #[test]
    fn non_image_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = TesseractExtractor::default().extract(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::ImageDecodeError { .. }));
    }

    #[test]
    fn valid_png_passes_the_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255])))
            .save(&path)
            .unwrap();
        check_image(&path).unwrap();
    }

    #[test]
    fn missing_engine_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])))
            .save(&path)
            .unwrap();
        let err = TesseractExtractor::new("scidoc-no-such-ocr-binary", "eng")
            .extract(&path)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::OcrEngineUnavailable { .. }));
    }
}
