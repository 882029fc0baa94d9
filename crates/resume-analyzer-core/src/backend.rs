use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("failed to rasterize document: {0}")]
    Rasterize(String),
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for backends that read the embedded text layer of a document.
///
/// Implementors return one entry per page, in page order. A page without a
/// text layer yields an empty string rather than an error.
pub trait PdfBackend: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}

/// Page images produced by a [`Rasterizer`].
///
/// The images live in a scratch directory owned by this value and are removed
/// when it is dropped.
#[derive(Debug)]
pub struct RasterizedPages {
    _dir: Option<TempDir>,
    pages: Vec<PathBuf>,
}

impl RasterizedPages {
    /// Take ownership of `dir` so the images outlive the caller's use of them.
    pub fn in_dir(dir: TempDir, pages: Vec<PathBuf>) -> Self {
        Self {
            _dir: Some(dir),
            pages,
        }
    }

    /// Wrap images whose lifetime is managed elsewhere.
    pub fn borrowed(pages: Vec<PathBuf>) -> Self {
        Self { _dir: None, pages }
    }

    pub fn pages(&self) -> &[PathBuf] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Renders each page of a document to an image file, in page order.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, path: &Path) -> Result<RasterizedPages, BackendError>;
}

/// Optical character recognition over a single page image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String, BackendError>;
}

/// Stand-in for a backend that was not compiled in.
///
/// Every call fails with the stored message, so the missing capability shows
/// up in the extraction logs instead of as a silently empty result.
#[derive(Debug, Clone)]
pub struct Unavailable {
    reason: String,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PdfBackend for Unavailable {
    fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
        Err(BackendError::Unavailable(self.reason.clone()))
    }
}

impl Rasterizer for Unavailable {
    fn rasterize(&self, _path: &Path) -> Result<RasterizedPages, BackendError> {
        Err(BackendError::Unavailable(self.reason.clone()))
    }
}

impl OcrEngine for Unavailable {
    fn recognize(&self, _image: &Path) -> Result<String, BackendError> {
        Err(BackendError::Unavailable(self.reason.clone()))
    }
}
