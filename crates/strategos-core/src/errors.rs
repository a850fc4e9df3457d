use std::time::Duration;

/// Failures of the generation backend. Never crosses the invoker boundary:
/// the engine renders these as `[LLM ERROR] …` text.
#[derive(Clone, Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no credentials configured for {0}")]
    MissingCredentials(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("empty response")]
    EmptyResponse,
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl BackendError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "missing_credentials",
            Self::Network(_) => "network_error",
            Self::Api { .. } => "api_error",
            Self::InvalidResponse(_) => "invalid_response",
            Self::EmptyResponse => "empty_response",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Failures of the search backend, scoped to a single query.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SearchError {
    #[error("no credentials configured for {0}")]
    MissingCredentials(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl SearchError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "missing_credentials",
            Self::Network(_) => "network_error",
            Self::Api { .. } => "api_error",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Timeout(_) => "timeout",
        }
    }
}
