//! Ingress adapters: how inbound messages reach the dispatcher.
//!
//! - `InboundHandler` -- the one interface every adapter feeds
//! - `Ingress` -- an adapter that runs until shutdown (webhook server, poller)
//! - `polling` -- pull-mode adapter over an `UpdateSource`
//!
//! The push-mode (webhook) adapter lives in `storecast-api` since it owns the
//! HTTP server.

pub mod polling;

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use storecast_types::chat::InboundMessage;
use storecast_types::error::IngressError;

use crate::dataset::DatasetSource;
use crate::dispatch::Dispatcher;
use crate::forecast::ForecastService;
use crate::transport::OutboundTransport;

pub use polling::{PollingIngress, UpdateCursor, UpdateSource};

/// Consumer of inbound messages.
pub trait InboundHandler: Send + Sync + 'static {
    fn handle(&self, message: InboundMessage) -> impl Future<Output = ()> + Send;
}

impl<D, F, T> InboundHandler for Dispatcher<D, F, T>
where
    D: DatasetSource + 'static,
    F: ForecastService + 'static,
    T: OutboundTransport + 'static,
{
    async fn handle(&self, message: InboundMessage) {
        self.dispatch(&message).await;
    }
}

/// A source of inbound messages that runs until `shutdown` is cancelled.
pub trait Ingress: Send {
    /// Short adapter name for logs ("polling", "webhook").
    fn name(&self) -> &'static str;

    fn run<H: InboundHandler>(
        self,
        handler: Arc<H>,
        shutdown: CancellationToken,
    ) -> impl Future<Output = Result<(), IngressError>> + Send;
}
