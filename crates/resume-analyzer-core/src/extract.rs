//! Two-stage document text extraction.
//!
//! Stage one reads the embedded text layer. When that yields nothing (or
//! fails), every page is rasterized and run through OCR. Errors never escape
//! [`TextExtractor::extract`]; they are logged and reported back as
//! [`StageFailure`]s inside the outcome.

use std::path::Path;

use tracing::{debug, warn};

use crate::backend::{OcrEngine, PdfBackend, Rasterizer};
use crate::{ExtractionOutcome, ExtractionStage, StageFailure};

pub struct TextExtractor {
    text_layer: Box<dyn PdfBackend>,
    rasterizer: Box<dyn Rasterizer>,
    ocr: Box<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(
        text_layer: impl PdfBackend + 'static,
        rasterizer: impl Rasterizer + 'static,
        ocr: impl OcrEngine + 'static,
    ) -> Self {
        Self {
            text_layer: Box::new(text_layer),
            rasterizer: Box::new(rasterizer),
            ocr: Box::new(ocr),
        }
    }

    /// Best-effort text of the document at `path`.
    pub fn extract(&self, path: &Path) -> ExtractionOutcome {
        let mut failures = Vec::new();

        match self.text_layer.extract_pages(path) {
            Ok(pages) => {
                let text = pages.concat();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return ExtractionOutcome::TextFound {
                        text: trimmed.to_string(),
                        stage: ExtractionStage::TextLayer,
                    };
                }
                debug!(
                    pages = pages.len(),
                    "no embedded text layer, falling back to OCR"
                );
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "text layer extraction failed");
                failures.push(StageFailure {
                    stage: ExtractionStage::TextLayer,
                    message: e.to_string(),
                });
            }
        }

        let text = self.ocr_pages(path, &mut failures);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            ExtractionOutcome::TextEmpty { failures }
        } else {
            ExtractionOutcome::TextFound {
                text: trimmed.to_string(),
                stage: ExtractionStage::Ocr,
            }
        }
    }

    /// Plain-string form of [`extract`](Self::extract); empty when nothing
    /// could be recovered.
    pub fn extract_text(&self, path: &Path) -> String {
        self.extract(path).into_text()
    }

    /// Rasterize and recognize every page, keeping whatever was recognized
    /// before the first failure.
    fn ocr_pages(&self, path: &Path, failures: &mut Vec<StageFailure>) -> String {
        let images = match self.rasterizer.rasterize(path) {
            Ok(images) => images,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "page rasterization failed");
                failures.push(StageFailure {
                    stage: ExtractionStage::Ocr,
                    message: e.to_string(),
                });
                return String::new();
            }
        };

        let mut pages_text = Vec::with_capacity(images.len());
        for (i, image) in images.pages().iter().enumerate() {
            match self.ocr.recognize(image) {
                Ok(text) => pages_text.push(text),
                Err(e) => {
                    warn!(page = i + 1, error = %e, "OCR failed, keeping earlier pages");
                    failures.push(StageFailure {
                        stage: ExtractionStage::Ocr,
                        message: e.to_string(),
                    });
                    break;
                }
            }
        }
        debug!(
            pages = images.len(),
            recognized = pages_text.len(),
            "OCR finished"
        );

        pages_text.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, RasterizedPages, Unavailable};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedPages(Vec<&'static str>);

    impl PdfBackend for FixedPages {
        fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct FakeRasterizer(usize);

    impl Rasterizer for FakeRasterizer {
        fn rasterize(&self, _path: &Path) -> Result<RasterizedPages, BackendError> {
            let pages = (1..=self.0)
                .map(|n| PathBuf::from(format!("page-{n}.png")))
                .collect();
            Ok(RasterizedPages::borrowed(pages))
        }
    }

    /// OCR spy: returns canned text per page and counts calls.
    struct SpyOcr {
        texts: Vec<Result<&'static str, &'static str>>,
        calls: Arc<AtomicUsize>,
    }

    impl OcrEngine for SpyOcr {
        fn recognize(&self, _image: &Path) -> Result<String, BackendError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.texts.get(n).copied().unwrap_or(Ok("")) {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(BackendError::Ocr(msg.to_string())),
            }
        }
    }

    fn spy(texts: Vec<Result<&'static str, &'static str>>) -> (SpyOcr, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            SpyOcr {
                texts,
                calls: calls.clone(),
            },
            calls,
        )
    }

    #[test]
    fn text_layer_pages_are_concatenated_without_separator() {
        let (ocr, calls) = spy(vec![Ok("should not be used")]);
        let extractor = TextExtractor::new(
            FixedPages(vec!["  Jane Doe\n", "Rust engineer", "  \n"]),
            FakeRasterizer(3),
            ocr,
        );

        let outcome = extractor.extract(Path::new("resume.pdf"));
        assert_eq!(
            outcome,
            ExtractionOutcome::TextFound {
                text: "Jane Doe\nRust engineer".to_string(),
                stage: ExtractionStage::TextLayer,
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_text_layer_falls_through_to_ocr() {
        let (ocr, calls) = spy(vec![Ok("Scanned page one\n"), Ok("page two ")]);
        let extractor = TextExtractor::new(FixedPages(vec!["", " \n"]), FakeRasterizer(2), ocr);

        let outcome = extractor.extract(Path::new("scan.pdf"));
        assert_eq!(outcome.stage(), Some(ExtractionStage::Ocr));
        assert_eq!(outcome.into_text(), "Scanned page one\n\npage two");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn text_layer_error_is_recorded_and_ocr_runs() {
        let (ocr, calls) = spy(vec![Ok("recovered")]);
        let extractor = TextExtractor::new(
            Unavailable::new("no pdf support"),
            FakeRasterizer(1),
            ocr,
        );

        let outcome = extractor.extract(Path::new("doc.pdf"));
        assert_eq!(outcome.into_text(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn both_stages_failing_yields_empty_with_causes() {
        let extractor = TextExtractor::new(
            Unavailable::new("corrupt"),
            Unavailable::new("cannot render"),
            Unavailable::new("unused"),
        );

        let outcome = extractor.extract(Path::new("corrupt.pdf"));
        match &outcome {
            ExtractionOutcome::TextEmpty { failures } => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].stage, ExtractionStage::TextLayer);
                assert_eq!(failures[1].stage, ExtractionStage::Ocr);
                assert_eq!(failures[1].message, "cannot render");
            }
            other => panic!("expected TextEmpty, got {other:?}"),
        }
        assert_eq!(extractor.extract_text(Path::new("corrupt.pdf")), "");
    }

    #[test]
    fn blank_document_is_empty_without_failures() {
        let (ocr, calls) = spy(vec![Ok("  "), Ok("\n")]);
        let extractor = TextExtractor::new(FixedPages(vec![""]), FakeRasterizer(2), ocr);

        let outcome = extractor.extract(Path::new("blank.pdf"));
        assert_eq!(outcome, ExtractionOutcome::TextEmpty { failures: vec![] });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn ocr_failure_keeps_earlier_pages() {
        let (ocr, calls) = spy(vec![Ok("first"), Err("engine crashed"), Ok("third")]);
        let extractor = TextExtractor::new(FixedPages(vec![]), FakeRasterizer(3), ocr);

        let outcome = extractor.extract(Path::new("partial.pdf"));
        assert_eq!(outcome.into_text(), "first");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
