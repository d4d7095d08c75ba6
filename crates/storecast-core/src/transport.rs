//! Outbound message transport trait.

use std::future::Future;

use storecast_types::chat::ChatId;
use storecast_types::error::TransportError;

/// Delivers formatted text (HTML markup allowed) to a chat.
///
/// The dispatcher treats delivery as fire-and-forget: errors are logged and
/// dropped, never fed back into the pipeline.
pub trait OutboundTransport: Send + Sync {
    fn send(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
