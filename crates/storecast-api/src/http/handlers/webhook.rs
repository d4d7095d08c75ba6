//! Telegram webhook receiver.
//!
//! Parses the pushed update, spawns the dispatch in the background, and
//! acknowledges at once so Telegram never waits on the forecast service.

use axum::body::Bytes;
use axum::extract::State;
use uuid::Uuid;

use storecast_core::ingress::InboundHandler;
use storecast_types::chat::Update;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /webhook - Receive one update.
///
/// Updates without a message (edits, callbacks, ...) are acknowledged and
/// dropped. Malformed JSON is a 400.
pub async fn receive_update<H: InboundHandler>(
    State(state): State<AppState<H>>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let update: Update = serde_json::from_slice(&body)?;
    let request_id = Uuid::now_v7();

    let Some(message) = update.message else {
        tracing::debug!(update_id = update.update_id, %request_id, "update without message");
        return Ok("OK");
    };

    tracing::info!(
        update_id = update.update_id,
        chat_id = %message.chat_id(),
        %request_id,
        "webhook update received"
    );

    let handler = state.handler.clone();
    tokio::spawn(async move {
        handler.handle(message).await;
        tracing::debug!(%request_id, "webhook dispatch finished");
    });

    Ok("OK")
}
