//! Builds engine components from settings.

use std::sync::Arc;
use std::time::Duration;

use strategos_engine::{BackendInvoker, ChatResponder, InMemorySessionStore, Orchestrator, SessionStore};
use strategos_llm::{build_backend, Sampling};
use strategos_search::{build_search_backend, SearchDispatcher};
use strategos_server::Services;
use strategos_settings::StrategosSettings;

pub fn build_orchestrator(settings: &StrategosSettings) -> Orchestrator {
    let sampling = Sampling::for_directive(&settings.generation);
    let timeout = sampling.timeout;
    let invoker = BackendInvoker::new(build_backend(&settings.generation, sampling), timeout);
    Orchestrator::new(invoker, build_dispatcher(settings), settings.directive.clone())
}

fn build_dispatcher(settings: &StrategosSettings) -> SearchDispatcher {
    SearchDispatcher::new(
        build_search_backend(&settings.search),
        settings.search.max_result_chars,
        Duration::from_secs(settings.search.timeout_secs),
    )
}

pub fn build_services(settings: &StrategosSettings) -> Services {
    let directive_sampling = Sampling::for_directive(&settings.generation);
    let directive_timeout = directive_sampling.timeout;
    let directive_backend = build_backend(&settings.generation, directive_sampling);
    let directive_invoker = BackendInvoker::new(directive_backend, directive_timeout);

    let chat_sampling = Sampling::for_chat(&settings.generation, &settings.chat);
    let chat_timeout = chat_sampling.timeout;
    let chat_invoker = BackendInvoker::new(build_backend(&settings.generation, chat_sampling), chat_timeout);

    let search = build_dispatcher(settings);
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    Services {
        backend_name: directive_invoker.backend_name().to_string(),
        search_name: search.backend_name().to_string(),
        orchestrator: Orchestrator::new(directive_invoker, search, settings.directive.clone()),
        chat: ChatResponder::new(chat_invoker, sessions.clone()),
        sessions,
    }
}
