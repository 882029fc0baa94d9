use std::fmt;

pub mod analysis;
pub mod backend;
pub mod config;
pub mod config_file;
pub mod extract;
pub mod model;
pub mod prompt;

// Re-export for convenience
pub use analysis::{AnalysisError, Analyzer};
pub use backend::{BackendError, OcrEngine, PdfBackend, RasterizedPages, Rasterizer, Unavailable};
pub use config::{Config, ConfigError, ExtractorConfig, ModelConfig, ServerConfig};
pub use extract::TextExtractor;
pub use model::{GeminiClient, GenerativeModel, ModelError};
pub use prompt::build_prompt;

/// The two text-recovery strategies, tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    /// Embedded text layer read straight from the document.
    TextLayer,
    /// Page images run through optical character recognition.
    Ocr,
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStage::TextLayer => f.write_str("text layer"),
            ExtractionStage::Ocr => f.write_str("ocr"),
        }
    }
}

/// A stage-level error that was recovered from by falling through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: ExtractionStage,
    pub message: String,
}

/// Result of running the two-stage extractor on a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Non-empty, whitespace-trimmed text recovered by `stage`.
    TextFound {
        text: String,
        stage: ExtractionStage,
    },
    /// Neither stage produced text. `failures` holds the errors that were
    /// swallowed along the way; it is empty when the document simply has no
    /// text.
    TextEmpty { failures: Vec<StageFailure> },
}

impl ExtractionOutcome {
    /// Collapse to plain text; an empty string means nothing was extracted.
    pub fn into_text(self) -> String {
        match self {
            ExtractionOutcome::TextFound { text, .. } => text,
            ExtractionOutcome::TextEmpty { .. } => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExtractionOutcome::TextEmpty { .. })
    }

    pub fn stage(&self) -> Option<ExtractionStage> {
        match self {
            ExtractionOutcome::TextFound { stage, .. } => Some(*stage),
            ExtractionOutcome::TextEmpty { .. } => None,
        }
    }
}
