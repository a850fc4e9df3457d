//! Route handlers.
//!
//! Bodies are read as raw bytes so malformed JSON and missing fields produce
//! the `{"detail": ...}` messages clients already match on.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Json, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use strategos_core::{ConversationContext, ConversationId, StreamToken};
use strategos_engine::DirectiveRequest;

use crate::error::{
    ServerError, INVALID_JSON, MISSING_CASE_FACTS, MISSING_CHAT_FIELDS, MISSING_PROMPT,
};
use crate::server::AppState;
use crate::sse::event_stream;

pub const COMPLETION_INFO: &str = "Directive generation complete.";

const INDEX_HTML: &str = r#"<h3>Legal Strategos API</h3>
<p><b>1. Generate Directive:</b> POST to <code>/generate_directive</code> with JSON <code>{"case_facts":"..."}</code> to start.</p>
<p><b>2. Chat:</b> POST to <code>/chat</code> with JSON <code>{"query":"...", "conversation_id": "..."}</code> to have a conversation.</p>
<p>Legacy: POST <code>/stream</code> with <code>{"case_facts":"..."}</code>, or GET <code>/stream?prompt=...</code>.</p>"#;

#[derive(Debug, Default, Deserialize)]
struct DirectiveBody {
    case_facts: Option<String>,
    first_instruction: Option<String>,
    prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatBody {
    query: Option<String>,
    conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StreamParams {
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub backend: String,
    pub search: String,
}

/// Parse a JSON body into `T`. Malformed JSON is a 400; fields of the wrong
/// shape count as absent.
fn parse_body<T>(body: &Bytes) -> Result<T, ServerError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let value: Value = serde_json::from_slice(body).map_err(|_| ServerError::BadRequest(INVALID_JSON))?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        backend: state.services.backend_name.clone(),
        search: state.services.search_name.clone(),
    })
}

/// POST /generate_directive
///
/// Registers a conversation, then streams its id, the directive, and a final
/// info event.
pub async fn generate_directive(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ServerError> {
    let body: DirectiveBody = parse_body(&body)?;
    let case_facts = present(body.case_facts).ok_or(ServerError::BadRequest(MISSING_CASE_FACTS))?;

    let conversation_id = ConversationId::new();
    state
        .services
        .sessions
        .set(&conversation_id, ConversationContext::new(case_facts.clone()));
    info!(conversation_id = %conversation_id, "directive requested");

    let mut request = DirectiveRequest::new(case_facts);
    request.instruction = present(body.first_instruction);
    let cancel = state.shutdown.request_token();
    let directive = state.services.orchestrator.run(request, cancel.clone());

    let tokens = async_stream::stream! {
        yield StreamToken::ConversationStarted(conversation_id.clone());
        let mut failures = 0usize;
        for await token in directive {
            if token.is_error() {
                failures += 1;
            }
            yield token;
        }
        if cancel.is_cancelled() {
            info!(conversation_id = %conversation_id, failures, "directive stream cancelled");
        } else {
            info!(conversation_id = %conversation_id, failures, "directive stream finished");
            yield StreamToken::Info(COMPLETION_INFO.to_string());
        }
    };
    Ok(event_stream(tokens, state.keep_alive).into_response())
}

/// POST /chat
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ServerError> {
    let body: ChatBody = parse_body(&body)?;
    let (Some(query), Some(conversation_id)) = (present(body.query), present(body.conversation_id)) else {
        return Err(ServerError::BadRequest(MISSING_CHAT_FIELDS));
    };

    let conversation_id = ConversationId::from_raw(conversation_id);
    info!(conversation_id = %conversation_id, "chat turn requested");
    let tokens = state.services.chat.respond(conversation_id, query);
    Ok(event_stream(tokens, state.keep_alive).into_response())
}

/// POST /stream
///
/// Directive only: no conversation is registered.
pub async fn stream_post(State(state): State<AppState>, body: Bytes) -> Result<Response, ServerError> {
    let body: DirectiveBody = parse_body(&body)?;
    let case_facts = present(body.case_facts)
        .or_else(|| present(body.prompt))
        .ok_or(ServerError::BadRequest(MISSING_CASE_FACTS))?;
    Ok(directive_only(&state, case_facts))
}

/// GET /stream?prompt=...
pub async fn stream_get(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Result<Response, ServerError> {
    let case_facts = present(params.prompt).ok_or(ServerError::BadRequest(MISSING_PROMPT))?;
    Ok(directive_only(&state, case_facts))
}

fn directive_only(state: &AppState, case_facts: String) -> Response {
    let tokens = state
        .services
        .orchestrator
        .run(DirectiveRequest::new(case_facts), state.shutdown.request_token());
    event_stream(tokens, state.keep_alive).into_response()
}
