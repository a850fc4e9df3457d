use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use strategos_engine::{ChatResponder, Orchestrator, SessionStore};

use crate::config::ServerConfig;
use crate::handlers;
use crate::shutdown::ShutdownCoordinator;

/// Engine components the routes delegate to.
#[derive(Clone)]
pub struct Services {
    pub orchestrator: Orchestrator,
    pub chat: ChatResponder,
    pub sessions: Arc<dyn SessionStore>,
    /// Reported by `/health`.
    pub backend_name: String,
    pub search_name: String,
}

/// Shared state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub shutdown: ShutdownCoordinator,
    pub keep_alive: Duration,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(services: Services, shutdown: ShutdownCoordinator, keep_alive: Duration) -> Self {
        Self {
            services: Arc::new(services),
            shutdown,
            keep_alive,
            start_time: Instant::now(),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/generate_directive", post(handlers::generate_directive))
        .route("/chat", post(handlers::chat))
        .route("/stream", post(handlers::stream_post).get(handlers::stream_get))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve in the background. Returns a handle to shut it down.
pub async fn start(config: ServerConfig, services: Services) -> Result<ServerHandle, std::io::Error> {
    let shutdown = ShutdownCoordinator::new();
    let state = AppState::new(services, shutdown.clone(), config.keep_alive);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "strategos server started");

    let token = shutdown.token();
    let task = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "server terminated");
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown,
        shutdown_timeout: config.shutdown_timeout,
        task,
    })
}

/// Handle returned by [`start`]. Dropping it leaves the server running.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown: ShutdownCoordinator,
    shutdown_timeout: Duration,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Cancel in-flight streams and wait for the server to stop.
    pub async fn shutdown(self) {
        self.shutdown
            .graceful_shutdown(self.task, self.shutdown_timeout)
            .await;
        info!("strategos server stopped");
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use strategos_engine::{BackendInvoker, InMemorySessionStore};
    use strategos_search::{SearchDispatcher, StubSearch};
    use strategos_settings::{DirectiveSettings, PacingSettings};

    use super::*;

    fn make_state() -> AppState {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let search = SearchDispatcher::new(Arc::new(StubSearch), 4000, Duration::from_secs(5));
        let directive = DirectiveSettings {
            pacing: PacingSettings::immediate(),
            ..Default::default()
        };
        let services = Services {
            orchestrator: Orchestrator::new(BackendInvoker::offline(), search, directive),
            chat: ChatResponder::new(BackendInvoker::offline(), sessions.clone()),
            sessions,
            backend_name: "placeholder".into(),
            search_name: "stub".into(),
        };
        AppState::new(services, ShutdownCoordinator::new(), Duration::from_secs(15))
    }

    async fn send(req: Request<Body>) -> (StatusCode, String) {
        let resp = build_router(make_state()).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn index_is_html() {
        let (status, body) = send(Request::builder().uri("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/generate_directive"));
    }

    #[tokio::test]
    async fn health_reports_backends() {
        let (status, body) = send(Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["backend"], "placeholder");
        assert_eq!(value["search"], "stub");
    }

    #[tokio::test]
    async fn generate_directive_rejects_invalid_json() {
        let (status, body) = send(post_json("/generate_directive", "{oops")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid JSON body"));
    }

    #[tokio::test]
    async fn generate_directive_requires_case_facts() {
        let (status, body) = send(post_json("/generate_directive", r#"{"case_facts": ""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Missing 'case_facts' in request body"));
    }

    #[tokio::test]
    async fn generate_directive_streams_full_directive() {
        let (status, body) = send(post_json(
            "/generate_directive",
            r#"{"case_facts": "Tenant eviction dispute, Delhi, lease signed 2022"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("data: [CONVERSATION_ID] conv_"));
        assert_eq!(body.matches("=== PART ").count(), 11);
        assert_eq!(body.matches("[WAR-GAME-DIRECTIVE-COMPLETE]").count(), 1);
        assert!(body.trim_end().ends_with("data: [INFO] Directive generation complete."));
    }

    #[tokio::test]
    async fn chat_requires_both_fields() {
        let (status, body) = send(post_json("/chat", r#"{"query": "next?"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Missing 'query' or 'conversation_id'"));
    }

    #[tokio::test]
    async fn chat_answers_unknown_conversation() {
        let (status, body) = send(post_json(
            "/chat",
            r#"{"query": "next?", "conversation_id": "conv_unknown"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data: (placeholder response) next?"));
    }

    #[tokio::test]
    async fn legacy_stream_get_requires_prompt() {
        let (status, body) = send(Request::builder().uri("/stream").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Provide ?prompt="));
    }

    #[tokio::test]
    async fn legacy_stream_post_accepts_prompt_field() {
        let (status, body) = send(post_json("/stream", r#"{"prompt": "Contract breach"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("[CONVERSATION_ID]"));
        assert_eq!(body.matches("[WAR-GAME-DIRECTIVE-COMPLETE]").count(), 1);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let req = Request::builder()
            .uri("/health")
            .header("origin", "https://client.example")
            .body(Body::empty())
            .unwrap();
        let resp = build_router(make_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}
