use std::io::Write;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extract::TextExtractor;
use crate::model::{GenerativeModel, ModelError};
use crate::prompt::build_prompt;
use crate::ExtractionOutcome;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No text could be extracted.")]
    NoText,
    #[error("failed to write temporary file: {0}")]
    TempFile(#[from] std::io::Error),
    #[error("extraction worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Upload-to-analysis pipeline shared by all requests.
pub struct Analyzer {
    extractor: Arc<TextExtractor>,
    model: Arc<dyn GenerativeModel>,
}

impl Analyzer {
    pub fn new(extractor: TextExtractor, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            model,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Analyze an uploaded document, optionally against a job description.
    ///
    /// The upload is materialized to a temporary file that is removed before
    /// this returns, whatever the outcome. The model is only called when
    /// extraction produced text.
    pub async fn analyze(
        &self,
        document: Vec<u8>,
        job_description: Option<&str>,
    ) -> Result<String, AnalysisError> {
        let resume_text = self.extract(document).await?;

        let prompt = build_prompt(&resume_text, job_description);
        debug!(
            prompt_chars = prompt.len(),
            with_job_description = job_description.is_some_and(|jd| !jd.trim().is_empty()),
            "calling model"
        );

        let reply = self.model.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }

    /// Write the upload to disk and run the extractor on a blocking worker.
    async fn extract(&self, document: Vec<u8>) -> Result<String, AnalysisError> {
        let extractor = self.extractor.clone();
        let outcome = tokio::task::spawn_blocking(move || -> std::io::Result<ExtractionOutcome> {
            let mut file = tempfile::Builder::new()
                .prefix("resume-")
                .suffix(".pdf")
                .tempfile()?;
            file.write_all(&document)?;
            file.flush()?;
            Ok(extractor.extract(file.path()))
        })
        .await??;

        match outcome {
            ExtractionOutcome::TextFound { text, stage } => {
                info!(%stage, chars = text.len(), "extracted resume text");
                Ok(text)
            }
            ExtractionOutcome::TextEmpty { failures } => {
                for failure in &failures {
                    warn!(stage = %failure.stage, cause = %failure.message, "extraction stage failed");
                }
                if failures.is_empty() {
                    info!("document contains no recognizable text");
                }
                Err(AnalysisError::NoText)
            }
        }
    }
}
