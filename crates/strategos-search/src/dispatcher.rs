//! Sequential per-query search execution.
//!
//! Each query is isolated: a failure becomes an error-tagged result text and
//! the remaining queries still run. Results are yielded lazily, in input order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use tracing::{info, warn};

use strategos_core::token::SEARCH_ERROR_TAG;
use strategos_core::{SearchBackend, SearchError};

use crate::truncate::truncate_chars;

pub const DEFAULT_MAX_RESULT_CHARS: usize = 4000;

/// One query paired with its (possibly failed) result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    pub result_text: String,
    pub succeeded: bool,
}

#[derive(Clone)]
pub struct SearchDispatcher {
    backend: Arc<dyn SearchBackend>,
    max_result_chars: usize,
    timeout: Duration,
}

impl SearchDispatcher {
    pub fn new(backend: Arc<dyn SearchBackend>, max_result_chars: usize, timeout: Duration) -> Self {
        Self {
            backend,
            max_result_chars,
            timeout,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Run `queries` one after another. The stream is finite and yields exactly
    /// one outcome per query.
    pub fn dispatch(&self, queries: Vec<String>) -> impl Stream<Item = SearchOutcome> + Send + 'static {
        let this = self.clone();
        async_stream::stream! {
            for query in queries {
                yield this.run_one(query).await;
            }
        }
    }

    async fn run_one(&self, query: String) -> SearchOutcome {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.backend.search(&query)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(self.timeout)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                let text = response.into_text();
                let result_text = truncate_chars(&text, self.max_result_chars).to_string();
                info!(query = %query, elapsed_ms, chars = result_text.len(), "search completed");
                SearchOutcome {
                    query,
                    result_text,
                    succeeded: true,
                }
            }
            Err(e) => {
                warn!(query = %query, elapsed_ms, error_kind = e.error_kind(), error = %e, "search failed");
                SearchOutcome {
                    query,
                    result_text: format!("{SEARCH_ERROR_TAG} {e}"),
                    succeeded: false,
                }
            }
        }
    }
}
