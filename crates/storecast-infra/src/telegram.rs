//! Telegram Bot API client.
//!
//! One [`TelegramClient`] serves both directions: it is the
//! [`OutboundTransport`] (`sendMessage` with HTML parse mode) and the
//! polling [`UpdateSource`] (`getUpdates` with offset and long-poll timeout).
//!
//! The bot token is part of every request URL. It is held as a
//! [`SecretString`], exposed only while building that URL, and stripped from
//! reqwest errors before they are logged.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use storecast_core::ingress::UpdateSource;
use storecast_core::transport::OutboundTransport;
use storecast_types::chat::{ChatId, Update, UpdateBatch};
use storecast_types::config::TelegramSettings;
use storecast_types::error::TransportError;

/// Slack added on top of the long-poll timeout for the HTTP request itself.
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: ChatId,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

/// Envelope of calls whose result the bot does not inspect.
#[derive(Debug, Deserialize)]
struct ApiAck {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client.
///
/// Does not derive Debug: the token must never reach log output.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    token: Arc<SecretString>,
    api_base: String,
    send_timeout: Duration,
}

impl TelegramClient {
    pub fn new(token: SecretString, settings: &TelegramSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: Arc::new(token),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            send_timeout: settings.send_timeout(),
        })
    }

    /// Build a client from an optional token, failing when it is absent.
    pub fn from_token(
        token: Option<SecretString>,
        settings: &TelegramSettings,
    ) -> Result<Self, TransportError> {
        let token = token.ok_or(TransportError::MissingToken)?;
        Self::new(token, settings)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token.expose_secret())
    }

    async fn call<B: Serialize>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<reqwest::Response, TransportError> {
        self.client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.without_url().to_string()))
    }
}

/// Map a non-`ok` Bot API envelope to a rejection.
fn rejected(description: Option<String>, status: reqwest::StatusCode) -> TransportError {
    TransportError::Rejected(description.unwrap_or_else(|| format!("HTTP {status}")))
}

impl OutboundTransport for TelegramClient {
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        let body = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
        };
        let response = self.call("sendMessage", &body, self.send_timeout).await?;
        let status = response.status();

        let ack: ApiAck = response
            .json()
            .await
            .map_err(|e| TransportError::Request(e.without_url().to_string()))?;
        if !ack.ok {
            return Err(rejected(ack.description, status));
        }

        tracing::debug!(%chat_id, bytes = text.len(), "message sent");
        Ok(())
    }
}

impl UpdateSource for TelegramClient {
    async fn fetch(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        let body = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: ["message"],
        };
        let response = self.call("getUpdates", &body, timeout + POLL_GRACE).await?;
        let status = response.status();

        let batch: UpdateBatch = response
            .json()
            .await
            .map_err(|e| TransportError::Request(e.without_url().to_string()))?;
        if !batch.ok {
            return Err(rejected(batch.description, status));
        }

        Ok(batch.result)
    }
}
