//! Single-attempt calls to the generation backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use strategos_core::token::LLM_ERROR_TAG;
use strategos_core::{BackendError, GenerationBackend};

/// Result of one backend call. Failures are values, never panics or `Err`s.
#[derive(Clone, Debug)]
pub enum Invocation {
    /// Text from the live backend.
    Generated(String),
    /// Local stand-in text; no backend is configured.
    Placeholder(String),
    Failed(BackendError),
}

impl Invocation {
    /// Raw text for the parser. Failures become `[LLM ERROR] <err>`.
    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) | Self::Placeholder(text) => text,
            Self::Failed(e) => format!("{LLM_ERROR_TAG} {e}"),
        }
    }
}

#[derive(Clone)]
pub struct BackendInvoker {
    backend: Option<Arc<dyn GenerationBackend>>,
    timeout: Duration,
}

impl BackendInvoker {
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Invoker that always answers with placeholders.
    pub fn offline() -> Self {
        Self::new(None, Duration::from_secs(1))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.as_ref().map_or("placeholder", |b| b.name())
    }

    /// Call the backend once. With no backend, `placeholder` supplies the text.
    pub async fn invoke<F>(&self, prompt: &str, placeholder: F) -> Invocation
    where
        F: FnOnce() -> String,
    {
        let Some(backend) = &self.backend else {
            return Invocation::Placeholder(placeholder());
        };

        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, backend.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.timeout)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                debug!(backend = backend.name(), elapsed_ms, chars = text.len(), "generation completed");
                Invocation::Generated(text)
            }
            Err(e) => {
                warn!(
                    backend = backend.name(),
                    elapsed_ms,
                    error_kind = e.error_kind(),
                    error = %e,
                    "generation failed"
                );
                Invocation::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use strategos_llm::{MockBackend, MockResponse};

    use super::*;

    fn invoker(mock: MockBackend) -> BackendInvoker {
        BackendInvoker::new(Some(Arc::new(mock)), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn offline_uses_placeholder() {
        let inv = BackendInvoker::offline().invoke("p", || "stand-in".into()).await;
        assert!(matches!(&inv, Invocation::Placeholder(t) if t == "stand-in"));
        assert_eq!(BackendInvoker::offline().backend_name(), "placeholder");
    }

    #[tokio::test]
    async fn live_backend_text_passes_through() {
        let inv = invoker(MockBackend::new(vec![MockResponse::text("out")]))
            .invoke("p", || unreachable!())
            .await;
        assert_eq!(inv.into_text(), "out");
    }

    #[tokio::test]
    async fn failure_becomes_tagged_text() {
        let inv = invoker(MockBackend::new(vec![MockResponse::Error(BackendError::Api {
            status: 503,
            body: "overloaded".into(),
        })]))
        .invoke("p", String::new)
        .await;
        assert!(matches!(inv, Invocation::Failed(BackendError::Api { status: 503, .. })));
        assert_eq!(inv.into_text(), "[LLM ERROR] api error 503: overloaded");
    }

    #[tokio::test]
    async fn hanging_backend_times_out() {
        tokio::time::pause();
        let mock = MockBackend::new(vec![MockResponse::delayed(
            Duration::from_secs(60),
            MockResponse::text("late"),
        )]);
        let inv = BackendInvoker::new(Some(Arc::new(mock)), Duration::from_secs(2))
            .invoke("p", String::new)
            .await;
        assert!(matches!(inv, Invocation::Failed(BackendError::Timeout(_))));
    }
}
