//! Google Gemini adapter using the non-streaming `generateContent` endpoint
//! with API-key auth.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use strategos_core::{BackendError, GenerationBackend};

use crate::factory::Sampling;
use crate::http;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiBackend {
    client: reqwest::Client,
    sampling: Sampling,
    base_url: String,
    api_key: SecretString,
}

impl GeminiBackend {
    pub fn new(sampling: Sampling, base_url: Option<String>, api_key: SecretString) -> Self {
        Self {
            client: http::build_client(sampling.timeout),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            sampling,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.sampling.model)
    }

    fn build_body(&self, prompt: &str) -> Value {
        let mut generation_config = json!({ "temperature": self.sampling.temperature });
        if let Some(max) = self.sampling.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(max);
        }
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        })
    }
}

/// Concatenate the text parts of the first candidate, skipping thought parts.
fn extract_text(body: &Value) -> Result<String, BackendError> {
    let parts = body["candidates"][0]["content"]["parts"].as_array();
    let text: String = parts
        .into_iter()
        .flatten()
        .filter(|part| !part["thought"].as_bool().unwrap_or(false))
        .filter_map(|part| part["text"].as_str())
        .collect();

    if !text.trim().is_empty() {
        return Ok(text);
    }
    if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
        return Err(BackendError::InvalidResponse(format!("prompt blocked: {reason}")));
    }
    if let Some(reason) = body["candidates"][0]["finishReason"].as_str() {
        if reason != "STOP" {
            return Err(BackendError::InvalidResponse(format!(
                "no text, finish reason {reason}"
            )));
        }
    }
    Err(BackendError::EmptyResponse)
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.sampling.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.sampling.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let timeout = self.sampling.timeout;
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&self.build_body(prompt))
            .send()
            .await
            .map_err(|e| http::map_send_error(&e, timeout))?;

        let body = http::read_json(response, timeout).await?;
        let text = extract_text(&body)?;
        debug!(response_len = text.len(), "gemini response received");
        Ok(text)
    }
}
