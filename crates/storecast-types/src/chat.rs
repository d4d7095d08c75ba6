//! Chat-facing types: chat identifiers and the inbound update envelope.
//!
//! The update shape follows the Telegram Bot API: an `update_id` cursor and an
//! optional `message` carrying the chat and its text. Only the fields the
//! dispatcher needs are modeled; everything else in the payload is ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a chat (Telegram chat ids are signed 64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One inbound update from the chat platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier (the polling cursor).
    #[serde(default)]
    pub update_id: i64,
    /// The message, if this update carries one. Other update kinds
    /// (edits, callbacks, ...) deserialize with `message = None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<InboundMessage>,
}

/// A chat message addressed to the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub chat: Chat,
    /// Message text. Absent for stickers, photos, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl InboundMessage {
    /// Build a text message for a chat.
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat: Chat { id: chat_id },
            text: Some(text.into()),
        }
    }

    /// The chat this message came from.
    pub fn chat_id(&self) -> ChatId {
        self.chat.id
    }

    /// The trimmed text, or an empty string when the message has none.
    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

/// Response envelope of the `getUpdates` call.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBatch {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Update>,
    #[serde(default)]
    pub description: Option<String>,
}
