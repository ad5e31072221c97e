//! Cancellable timer for the delayed terminal effect.

use crate::cancellation::CancellationToken;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

/// Posted to the driver when a scheduled effect is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerSignal {
    /// The delayed terminal effect of this stage is due.
    TerminalDue {
        /// The button stage that scheduled it.
        stage_id: String,
    },
}

/// A scheduled terminal effect. Cancelled on drop.
#[derive(Debug)]
pub struct TerminalTimer {
    token: Arc<CancellationToken>,
    handle: JoinHandle<()>,
}

impl TerminalTimer {
    /// Schedules a [`TimerSignal::TerminalDue`] for `stage_id` after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn schedule(
        stage_id: impl Into<String>,
        delay: Duration,
        signals: UnboundedSender<TimerSignal>,
    ) -> Self {
        let stage_id = stage_id.into();
        let token = Arc::new(CancellationToken::new());
        let task_token = Arc::clone(&token);

        let handle = tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    if task_token.is_cancelled() {
                        return;
                    }
                    debug!(stage_id = %stage_id, "Terminal timer elapsed");
                    // The receiver is gone only if the driver was torn down.
                    let _ = signals.send(TimerSignal::TerminalDue { stage_id });
                }
                () = task_token.cancelled() => {
                    debug!(stage_id = %stage_id, reason = ?task_token.reason(), "Terminal timer cancelled");
                }
            }
        });

        Self { token, handle }
    }

    /// Cancels the timer. Idempotent.
    pub fn cancel(&self, reason: &str) {
        self.token.cancel(reason);
        self.handle.abort();
    }

    /// Returns true if the timer was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns true once the timer task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TerminalTimer {
    fn drop(&mut self) {
        self.cancel("timer dropped");
    }
}
