//! Search backends and the per-section search dispatcher.

pub mod dispatcher;
pub mod factory;
pub mod mock;
pub mod stub;
pub mod tavily;
pub mod truncate;

pub use dispatcher::{SearchDispatcher, SearchOutcome};
pub use factory::build_search_backend;
pub use mock::MockSearch;
pub use stub::StubSearch;
pub use tavily::TavilySearch;
