//! `storecast ask` -- run one message through the dispatcher locally.
//!
//! Replies go to a console transport instead of Telegram, so the full
//! pipeline (dataset, forecast service, formatting) can be checked without a
//! bot token.

use std::sync::Mutex;

use console::style;

use storecast_core::Disposition;
use storecast_core::transport::OutboundTransport;
use storecast_types::chat::{ChatId, InboundMessage};
use storecast_types::error::TransportError;

use crate::state::{RuntimeConfig, build_dispatcher};

/// Transport that collects replies for printing.
#[derive(Debug, Default)]
pub struct ConsoleTransport {
    sent: Mutex<Vec<String>>,
}

impl ConsoleTransport {
    pub fn replies(&self) -> Vec<String> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl OutboundTransport for ConsoleTransport {
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        tracing::debug!(%chat_id, bytes = text.len(), "console reply");
        self.sent
            .lock()
            .map_err(|_| TransportError::Request("console transport poisoned".to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

/// Render Telegram HTML for a terminal: bold tags become styled text.
pub fn render_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("<b>") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        match after.find("</b>") {
            Some(end) => {
                out.push_str(&style(&after[..end]).bold().to_string());
                rest = &after[end + 4..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub async fn ask(
    runtime: RuntimeConfig,
    text: String,
    chat_id: i64,
    json: bool,
) -> anyhow::Result<()> {
    let dispatcher = build_dispatcher(&runtime.config, ConsoleTransport::default())?;
    let message = InboundMessage::text(ChatId(chat_id), text);

    let disposition = dispatcher.dispatch(&message).await;
    let replies = dispatcher.transport().replies();

    if json {
        let outcomes = match &disposition {
            Disposition::Answered(reports) => serde_json::to_value(reports)?,
            _ => serde_json::Value::Null,
        };
        let out = serde_json::json!({
            "chat_id": chat_id,
            "disposition": disposition_label(&disposition),
            "stores": outcomes,
            "replies": replies,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for reply in &replies {
        println!();
        for line in render_html(reply).lines() {
            println!("  {line}");
        }
    }
    println!();
    Ok(())
}

fn disposition_label(disposition: &Disposition) -> &'static str {
    match disposition {
        Disposition::RateLimited => "rate_limited",
        Disposition::Command(_) => "command",
        Disposition::InvalidInput => "invalid_input",
        Disposition::Answered(_) => "answered",
    }
}
