use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use strategos_core::{SearchBackend, SearchError, SearchResponse};

/// Search backend returning scripted results in call order.
///
/// Calls past the end of the script echo the query back as text.
pub struct MockSearch {
    results: Vec<Result<SearchResponse, SearchError>>,
    call_count: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new(results: Vec<Result<SearchResponse, SearchError>>) -> Self {
        Self {
            results,
            call_count: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchBackend for MockSearch {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let idx = self.call_count.fetch_add(1, Ordering::Relaxed);
        self.queries.lock().push(query.to_string());
        match self.results.get(idx) {
            Some(result) => result.clone(),
            None => Ok(SearchResponse::Text(format!("results for {query}"))),
        }
    }
}
