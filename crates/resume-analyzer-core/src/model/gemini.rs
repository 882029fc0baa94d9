use std::future::Future;
use std::pin::Pin;

use super::{GenerativeModel, ModelError};
use crate::config::ModelConfig;

/// Client for the Gemini `generateContent` REST endpoint.
///
/// The API key travels in the `x-goog-api-key` header rather than the query
/// string, so it never appears in request errors surfaced to callers.
pub struct GeminiClient {
    config: ModelConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: ModelConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: ModelConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        Box::pin(async move {
            let body = serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            });

            let mut request = self
                .client
                .post(self.endpoint())
                .header("x-goog-api-key", self.config.api_key.as_str())
                .json(&body);
            if let Some(timeout) = self.config.timeout {
                request = request.timeout(timeout);
            }

            let resp = request.send().await?;

            let status = resp.status();
            if !status.is_success() {
                let raw = resp.text().await.unwrap_or_default();
                let message = serde_json::from_str::<serde_json::Value>(&raw)
                    .ok()
                    .and_then(|v| v["error"]["message"].as_str().map(String::from))
                    .unwrap_or(raw);
                return Err(ModelError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let data: serde_json::Value = resp.json().await?;
            response_text(&data)
        })
    }
}

/// Concatenate the text parts of the first candidate.
fn response_text(data: &serde_json::Value) -> Result<String, ModelError> {
    let candidate = &data["candidates"][0];
    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = data["promptFeedback"]["blockReason"]
            .as_str()
            .or_else(|| candidate["finishReason"].as_str())
            .unwrap_or("no candidates returned");
        return Err(ModelError::EmptyResponse(reason.to_string()));
    }

    Ok(text)
}
