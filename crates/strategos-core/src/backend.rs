//! Collaborator contracts for the two external services the pipeline calls.

use async_trait::async_trait;

use crate::errors::{BackendError, SearchError};

/// Opaque text-completion service: prompt in, text out, or a failure.
///
/// One implementation exists per vendor; the process picks one at startup.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Result of a search call. Vendors return either structured JSON or plain text.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchResponse {
    Json(serde_json::Value),
    Text(String),
}

impl SearchResponse {
    /// Serialize to the text form that is streamed to clients.
    pub fn into_text(self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string(&value).unwrap_or_else(|_| value.to_string())
            }
            Self::Text(text) => text,
        }
    }
}

/// Query-in, result-out search service.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}
