//! OCR fallback backends built on external tools.
//!
//! - [`PdftoppmRasterizer`] renders pages with `pdftoppm` (poppler-utils).
//! - [`TesseractEngine`] recognizes page images with `tesseract`.
//!
//! Both shell out, so a missing binary shows up as a [`BackendError::Ocr`] or
//! [`BackendError::Rasterize`] at request time rather than a link error.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use resume_analyzer_core::{BackendError, OcrEngine, RasterizedPages, Rasterizer};

/// Renders every page of a PDF to PNG at a fixed resolution.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    program: OsString,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self {
            program: "pdftoppm".into(),
            dpi,
        }
    }

    /// Use a specific `pdftoppm` executable.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(&self, path: &Path) -> Result<RasterizedPages, BackendError> {
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("page");

        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(path)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                BackendError::Rasterize(format!(
                    "failed to run {}: {}",
                    self.program.to_string_lossy(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Rasterize(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter_map(|p| page_number(&p).map(|n| (n, p)))
            .collect();
        pages.sort_by_key(|(n, _)| *n);

        tracing::debug!(pages = pages.len(), dpi = self.dpi, "rasterized document");

        Ok(RasterizedPages::in_dir(
            dir,
            pages.into_iter().map(|(_, p)| p).collect(),
        ))
    }
}

/// Page number of a `pdftoppm` output file (`page-7.png`, `page-07.png`, ...).
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("page-")?.parse().ok()
}

/// Runs `tesseract <image> stdout -l <lang>` on a page image.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    program: OsString,
    lang: String,
}

impl TesseractEngine {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            program: "tesseract".into(),
            lang: lang.into(),
        }
    }

    /// Use a specific `tesseract` executable.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &Path) -> Result<String, BackendError> {
        let output = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| {
                BackendError::Ocr(format!(
                    "failed to run {}: {}",
                    self.program.to_string_lossy(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Ocr(format!(
                "tesseract exited with {} on {}: {}",
                output.status,
                image.display(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
