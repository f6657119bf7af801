//! Rasterizer adapter: first page of a PDF → transient PNG via pdfium.
//!
//! Only page 1 is rendered. The image is written into a `TempDir` owned by
//! the returned [`RasterImage`]; it disappears when the value is dropped, so
//! callers must finish OCR before letting it go.
//!
//! pdfium is not async-safe, so the orchestrator calls [`Rasterizer::rasterize`]
//! inside `spawn_blocking` and awaits it immediately.

use crate::error::AnalysisError;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// PDF user-space units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Converts a paginated document into a single raster image.
pub trait Rasterizer: Send + Sync {
    /// Render the first page of `document`.
    ///
    /// # Errors
    /// [`AnalysisError::UnreadableDocument`] when the document cannot be
    /// parsed or has zero pages.
    fn rasterize(&self, document: &Path) -> Result<RasterImage, AnalysisError>;
}

/// A raster image on disk, possibly owned by a temporary directory.
#[derive(Debug)]
pub enum RasterImage {
    /// An existing image the caller owns (e.g. the input itself).
    Borrowed(PathBuf),
    /// A rendered page; the directory is removed on drop.
    Transient { path: PathBuf, _dir: TempDir },
}

impl RasterImage {
    pub fn path(&self) -> &Path {
        match self {
            RasterImage::Borrowed(p) => p,
            RasterImage::Transient { path, .. } => path,
        }
    }
}

/// Default rasterizer backed by pdfium-render.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    dpi: u32,
    library_path: Option<PathBuf>,
}

impl PdfiumRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi,
            library_path: None,
        }
    }

    /// Bind to this pdfium library instead of searching `./` and the system.
    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    fn bind(&self) -> Result<Pdfium, AnalysisError> {
        let bindings = match &self.library_path {
            Some(p) => Pdfium::bind_to_library(p),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| AnalysisError::PdfiumBindingFailed(e.to_string()))?;
        Ok(Pdfium::new(bindings))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(&self, document: &Path) -> Result<RasterImage, AnalysisError> {
        let unreadable = |detail: String| AnalysisError::UnreadableDocument {
            path: document.to_path_buf(),
            detail,
        };

        let pdfium = self.bind()?;
        let pdf = pdfium
            .load_pdf_from_file(document, None)
            .map_err(|e| unreadable(format!("{:?}", e)))?;

        let pages = pdf.pages();
        if pages.len() == 0 {
            return Err(unreadable("document has no pages".into()));
        }
        let page = pages.get(0).map_err(|e| unreadable(format!("{:?}", e)))?;

        let scale = self.dpi as f32 / POINTS_PER_INCH;
        let render_config = PdfRenderConfig::new()
            .set_target_width((page.width().value * scale) as i32)
            .set_target_height((page.height().value * scale) as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| unreadable(format!("render failed: {:?}", e)))?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page 1 of {} → {}x{} px @ {} dpi",
            document.display(),
            image.width(),
            image.height(),
            self.dpi
        );

        let dir = TempDir::new().map_err(|e| AnalysisError::Internal(format!("tempdir: {e}")))?;
        let path = dir.path().join("page-1.png");
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| AnalysisError::Internal(format!("Failed to write page image: {e}")))?;

        Ok(RasterImage::Transient { path, _dir: dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_image_keeps_path() {
        let img = RasterImage::Borrowed(PathBuf::from("scan.png"));
        assert_eq!(img.path(), Path::new("scan.png"));
    }

    #[test]
    fn transient_image_is_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page-1.png");
        std::fs::write(&path, b"png").unwrap();
        let root = dir.path().to_path_buf();

        let img = RasterImage::Transient { path, _dir: dir };
        assert!(img.path().exists());
        drop(img);
        assert!(!root.exists());
    }

    #[test]
    fn garbage_pdf_is_an_error() {
        // Without a pdfium library this fails at binding time; with one, the
        // parse fails. Either way no image is produced.
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.7 not really").unwrap();

        let err = PdfiumRasterizer::new(200).rasterize(&path).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::UnreadableDocument { .. } | AnalysisError::PdfiumBindingFailed(_)
        ));
    }
}
