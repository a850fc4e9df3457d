use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

pub const INVALID_JSON: &str = "Invalid JSON body";
pub const MISSING_CASE_FACTS: &str = "Missing 'case_facts' in request body";
pub const MISSING_CHAT_FIELDS: &str = "Missing 'query' or 'conversation_id'";
pub const MISSING_PROMPT: &str =
    "Provide ?prompt=... or use POST with JSON {'case_facts': '...'}";

/// Request-level failures. Rendered as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(&'static str),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), detail = %self, "request rejected");
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
