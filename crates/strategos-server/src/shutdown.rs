//! Graceful shutdown coordination via `CancellationToken`.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Root cancellation for the server and every stream it serves.
#[derive(Clone, Debug, Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Token for one request; cancelled with the server but independently cancellable.
    pub fn request_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Cancel everything, then wait up to `timeout` for `task` to finish.
    pub async fn graceful_shutdown(&self, task: JoinHandle<()>, timeout: Duration) {
        self.shutdown();
        info!(timeout_secs = timeout.as_secs(), "waiting for in-flight streams");
        if tokio::time::timeout(timeout, task).await.is_err() {
            warn!("shutdown timed out after {timeout:?}, some streams may still be open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_not_shutting_down() {
        assert!(!ShutdownCoordinator::new().token().is_cancelled());
    }

    #[test]
    fn shutdown_cancels_request_tokens() {
        let coord = ShutdownCoordinator::new();
        let request = coord.request_token();
        coord.shutdown();
        assert!(coord.token().is_cancelled());
        assert!(request.is_cancelled());
    }

    #[test]
    fn request_token_cancel_is_local() {
        let coord = ShutdownCoordinator::new();
        let request = coord.request_token();
        request.cancel();
        assert!(!coord.token().is_cancelled());
    }

    #[tokio::test]
    async fn graceful_shutdown_waits_for_task() {
        let coord = ShutdownCoordinator::new();
        let token = coord.token();
        let task = tokio::spawn(async move { token.cancelled().await });
        coord.graceful_shutdown(task, Duration::from_secs(1)).await;
        assert!(coord.token().is_cancelled());
    }
}
