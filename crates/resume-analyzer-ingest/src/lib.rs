use std::path::Path;

use resume_analyzer_core::{ExtractionOutcome, ExtractorConfig, TextExtractor};

// Re-export domain types for convenience
pub use resume_analyzer_core::{ExtractionStage, StageFailure};

/// Build the extractor used by the server.
///
/// - text layer → MuPDF (requires the `pdf` feature)
/// - OCR fallback → `pdftoppm` + `tesseract` (requires the `ocr` feature)
///
/// A stage whose feature is disabled is wired to a backend that always fails,
/// so the missing capability is logged on every fall-through.
pub fn default_extractor(config: &ExtractorConfig) -> TextExtractor {
    let extractor = TextExtractor::new(text_layer(), rasterizer(config), ocr_engine(config));
    tracing::debug!(
        pdf = cfg!(feature = "pdf"),
        ocr = cfg!(feature = "ocr"),
        lang = %config.ocr_lang,
        dpi = config.ocr_dpi,
        "text extractor ready"
    );
    extractor
}

/// Extract text from the document at `path` with the default backends.
pub fn extract_document(path: &Path, config: &ExtractorConfig) -> ExtractionOutcome {
    default_extractor(config).extract(path)
}

#[cfg(feature = "pdf")]
fn text_layer() -> resume_analyzer_pdf_mupdf::MupdfBackend {
    resume_analyzer_pdf_mupdf::MupdfBackend::new()
}

#[cfg(not(feature = "pdf"))]
fn text_layer() -> resume_analyzer_core::Unavailable {
    resume_analyzer_core::Unavailable::new(
        "PDF support not compiled in (enable the `pdf` feature of resume-analyzer-ingest)",
    )
}

#[cfg(feature = "ocr")]
fn rasterizer(config: &ExtractorConfig) -> resume_analyzer_ocr::PdftoppmRasterizer {
    resume_analyzer_ocr::PdftoppmRasterizer::new(config.ocr_dpi)
}

#[cfg(feature = "ocr")]
fn ocr_engine(config: &ExtractorConfig) -> resume_analyzer_ocr::TesseractEngine {
    resume_analyzer_ocr::TesseractEngine::new(config.ocr_lang.clone())
}

#[cfg(not(feature = "ocr"))]
fn rasterizer(_config: &ExtractorConfig) -> resume_analyzer_core::Unavailable {
    resume_analyzer_core::Unavailable::new(
        "OCR support not compiled in (enable the `ocr` feature of resume-analyzer-ingest)",
    )
}

#[cfg(not(feature = "ocr"))]
fn ocr_engine(_config: &ExtractorConfig) -> resume_analyzer_core::Unavailable {
    resume_analyzer_core::Unavailable::new("OCR support not compiled in")
}
