//! Generative-text model trait and implementations.

pub mod gemini;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("model returned no text: {0}")]
    EmptyResponse(String),
    #[error("{0}")]
    Other(String),
}

/// A hosted model that turns a single prompt into a single text reply.
pub trait GenerativeModel: Send + Sync {
    /// Model identifier sent upstream (e.g. "gemini-2.0-flash").
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`. No retries, no streaming.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>>;
}
