use async_trait::async_trait;

use strategos_core::{SearchBackend, SearchError, SearchResponse};

/// Offline search used when no search provider is configured.
#[derive(Clone, Debug, Default)]
pub struct StubSearch;

#[async_trait]
impl SearchBackend for StubSearch {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        Ok(SearchResponse::Text(format!(
            "(search stub) Results for query: {query}"
        )))
    }
}
