//! OpenAI-compatible chat completions adapter (non-streaming).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::instrument;

use strategos_core::{BackendError, GenerationBackend};

use crate::factory::Sampling;
use crate::http;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiBackend {
    client: reqwest::Client,
    sampling: Sampling,
    base_url: String,
    api_key: SecretString,
}

impl OpenAiBackend {
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

    fn build_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.sampling.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.sampling.temperature,
        });
        if let Some(max) = self.sampling.max_output_tokens {
            body["max_tokens"] = json!(max);
        }
        body
    }
}

fn extract_text(body: &Value) -> Result<String, BackendError> {
    match body["choices"][0]["message"]["content"].as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        Some(_) => Err(BackendError::EmptyResponse),
        None => Err(BackendError::InvalidResponse(
            "missing choices[0].message.content".into(),
        )),
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.sampling.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.sampling.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let timeout = self.sampling.timeout;
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.build_body(prompt))
            .send()
            .await
            .map_err(|e| http::map_send_error(&e, timeout))?;

        let body = http::read_json(response, timeout).await?;
        extract_text(&body)
    }
}
