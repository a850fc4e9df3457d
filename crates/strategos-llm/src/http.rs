use std::time::Duration;

use strategos_core::BackendError;

const USER_AGENT: &str = "strategos/0.1";

pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
}

/// Classify a transport failure.
pub(crate) fn map_send_error(e: &reqwest::Error, timeout: Duration) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout(timeout)
    } else {
        BackendError::Network(e.to_string())
    }
}

/// Turn a non-2xx response into `BackendError::Api`, or parse the JSON body.
pub(crate) async fn read_json(
    response: reqwest::Response,
    timeout: Duration,
) -> Result<serde_json::Value, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Api {
            status: status.as_u16(),
            body,
        });
    }
    response.json().await.map_err(|e| {
        if e.is_timeout() {
            BackendError::Timeout(timeout)
        } else {
            BackendError::InvalidResponse(e.to_string())
        }
    })
}
