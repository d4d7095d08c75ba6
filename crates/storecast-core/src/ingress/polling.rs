//! Pull-mode ingress: long-poll an update source and dispatch sequentially.
//!
//! Updates are handled one at a time, in order, with no overlap between
//! dispatches. The cursor only moves past updates that were actually
//! consumed, so a failed fetch is retried from the same offset.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use storecast_types::chat::Update;
use storecast_types::config::IngressSettings;
use storecast_types::error::{IngressError, TransportError};

use super::{InboundHandler, Ingress};

/// Source of pending updates (Telegram `getUpdates`).
pub trait UpdateSource: Send + Sync {
    /// Fetch updates with `update_id >= offset`, waiting up to `timeout` for
    /// at least one to arrive.
    fn fetch(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Update>, TransportError>> + Send;
}

/// Position in the update stream: one past the highest consumed update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCursor {
    next: Option<i64>,
}

impl UpdateCursor {
    /// Offset for the next fetch; `None` before anything was consumed.
    pub fn offset(&self) -> Option<i64> {
        self.next
    }

    /// Mark `update_id` as consumed. The cursor never moves backwards.
    pub fn advance(&mut self, update_id: i64) {
        let candidate = update_id + 1;
        self.next = Some(self.next.map_or(candidate, |next| next.max(candidate)));
    }
}

/// Polling ingress adapter.
pub struct PollingIngress<S> {
    source: S,
    poll_timeout: Duration,
    idle_pause: Duration,
    error_pause: Duration,
}

impl<S: UpdateSource> PollingIngress<S> {
    pub fn new(source: S, settings: &IngressSettings) -> Self {
        Self {
            source,
            poll_timeout: settings.poll_timeout(),
            idle_pause: settings.idle_pause(),
            error_pause: settings.error_pause(),
        }
    }

    /// Fetch once and dispatch everything fetched. Returns the number of
    /// updates consumed.
    pub async fn poll_once<H: InboundHandler>(
        &self,
        cursor: &mut UpdateCursor,
        handler: &H,
    ) -> Result<usize, TransportError> {
        let updates = self
            .source
            .fetch(cursor.offset(), self.poll_timeout)
            .await?;
        Ok(drain(updates, cursor, handler).await)
    }
}

/// Dispatch updates in order, advancing the cursor past each one.
async fn drain<H: InboundHandler>(
    updates: Vec<Update>,
    cursor: &mut UpdateCursor,
    handler: &H,
) -> usize {
    let count = updates.len();
    for update in updates {
        cursor.advance(update.update_id);
        match update.message {
            Some(message) => handler.handle(message).await,
            None => debug!(update_id = update.update_id, "skipping update without message"),
        }
    }
    count
}

impl<S: UpdateSource + 'static> Ingress for PollingIngress<S> {
    fn name(&self) -> &'static str {
        "polling"
    }

    async fn run<H: InboundHandler>(
        self,
        handler: Arc<H>,
        shutdown: CancellationToken,
    ) -> Result<(), IngressError> {
        info!(
            poll_timeout_secs = self.poll_timeout.as_secs(),
            "polling for updates"
        );
        let mut cursor = UpdateCursor::default();

        loop {
            // Shutdown only interrupts the fetch or a pause, never a dispatch.
            let fetched = tokio::select! {
                _ = shutdown.cancelled() => break,
                fetched = self.source.fetch(cursor.offset(), self.poll_timeout) => fetched,
            };

            let pause = match fetched {
                Ok(updates) if updates.is_empty() => self.idle_pause,
                Ok(updates) => {
                    let consumed = drain(updates, &mut cursor, handler.as_ref()).await;
                    debug!(consumed, offset = ?cursor.offset(), "drained updates");
                    continue;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        offset = ?cursor.offset(),
                        "failed to fetch updates, retrying"
                    );
                    self.error_pause
                }
            };

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!("polling stopped");
        Ok(())
    }
}
