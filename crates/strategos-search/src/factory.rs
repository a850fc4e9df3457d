use std::sync::Arc;

use tracing::{info, warn};

use strategos_core::SearchBackend;
use strategos_settings::{read_secret, SearchProviderKind, SearchSettings};

use crate::stub::StubSearch;
use crate::tavily::TavilySearch;

/// Build the configured search backend. Missing credentials fall back to the stub.
pub fn build_search_backend(settings: &SearchSettings) -> Arc<dyn SearchBackend> {
    if settings.provider == SearchProviderKind::None {
        info!("search disabled, using stub results");
        return Arc::new(StubSearch);
    }

    match read_secret(&settings.api_key_env) {
        Some(key) => {
            info!(provider = "tavily", "search backend ready");
            Arc::new(TavilySearch::new(settings.clone(), key))
        }
        None => {
            warn!(env = ?settings.api_key_env, "no search API key found, using stub results");
            Arc::new(StubSearch)
        }
    }
}
