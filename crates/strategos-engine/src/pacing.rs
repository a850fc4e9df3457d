use std::time::Duration;

use strategos_settings::PacingSettings;
use tokio_util::sync::CancellationToken;

/// Points in the emission sequence where the stream pauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pause {
    /// After a reasoning or deliverable line.
    Line,
    Query,
    ToolResultLine,
    /// After each search outcome.
    Search,
    Section,
}

/// Inserts the configured delays between chunks and observes cancellation.
#[derive(Clone, Debug)]
pub struct Pacer {
    settings: PacingSettings,
    cancel: CancellationToken,
}

impl Pacer {
    pub fn new(settings: PacingSettings, cancel: CancellationToken) -> Self {
        Self { settings, cancel }
    }

    pub fn delay(&self, pause: Pause) -> Duration {
        let ms = match pause {
            Pause::Line => self.settings.line_delay_ms,
            Pause::Query => self.settings.query_delay_ms,
            Pause::ToolResultLine => self.settings.tool_result_line_delay_ms,
            Pause::Search => self.settings.search_delay_ms,
            Pause::Section => self.settings.section_delay_ms,
        };
        Duration::from_millis(ms)
    }

    /// Wait out one pause. Returns `false` if the run was cancelled.
    ///
    /// A zero delay still yields so other tasks can flush output.
    pub async fn pause(&self, pause: Pause) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        let delay = self.delay(pause);
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
