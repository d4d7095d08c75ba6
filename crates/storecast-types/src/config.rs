//! Configuration types for Storecast.
//!
//! `StorecastConfig` represents the top-level `config.toml`: rate limiting,
//! forecast endpoint, dataset location, ingress mode, and Telegram settings.
//! Every field has a default so an empty (or missing) file is valid.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `~/.storecast/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorecastConfig {
    #[serde(default)]
    pub bot: BotSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub ingress: IngressSettings,
    #[serde(default)]
    pub telegram: TelegramSettings,
}

/// Conversation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Minimum seconds between two accepted requests of one chat.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Forecast horizon advertised in the welcome and help texts.
    #[serde(default = "default_horizon_weeks")]
    pub horizon_weeks: u32,
    /// Marker printed in front of every monetary value.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_cooldown_secs() -> u64 {
    5
}

fn default_horizon_weeks() -> u32 {
    6
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

impl BotSettings {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            horizon_weeks: default_horizon_weeks(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// External forecasting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSettings {
    #[serde(default = "default_forecast_url")]
    pub url: String,
    #[serde(default = "default_forecast_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on forecast calls in flight for one message.
    #[serde(default = "default_forecast_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_forecast_url() -> String {
    "https://rossmann-api-ekwe.onrender.com/rossmann/predict".to_string()
}

fn default_forecast_timeout_secs() -> u64 {
    10
}

fn default_forecast_max_concurrency() -> usize {
    4
}

impl ForecastSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            url: default_forecast_url(),
            timeout_secs: default_forecast_timeout_secs(),
            max_concurrency: default_forecast_max_concurrency(),
        }
    }
}

/// Location of the CSV dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSettings {
    #[serde(default = "default_dataset_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_test_file")]
    pub test_file: String,
    #[serde(default = "default_store_file")]
    pub store_file: String,
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_test_file() -> String {
    "test.csv".to_string()
}

fn default_store_file() -> String {
    "store.csv".to_string()
}

impl DatasetSettings {
    pub fn test_path(&self) -> PathBuf {
        self.dir.join(&self.test_file)
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.join(&self.store_file)
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            dir: default_dataset_dir(),
            test_file: default_test_file(),
            store_file: default_store_file(),
        }
    }
}

/// How inbound messages reach the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngressMode {
    /// Long-poll `getUpdates` (local development).
    #[default]
    Polling,
    /// Receive pushed updates on `POST /webhook` (production).
    Webhook,
}

impl fmt::Display for IngressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngressMode::Polling => write!(f, "polling"),
            IngressMode::Webhook => write!(f, "webhook"),
        }
    }
}

impl FromStr for IngressMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polling" | "poll" => Ok(IngressMode::Polling),
            "webhook" => Ok(IngressMode::Webhook),
            other => Err(format!("unknown ingress mode: '{other}'")),
        }
    }
}

/// Ingress adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressSettings {
    #[serde(default)]
    pub mode: IngressMode,
    /// Webhook bind host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Webhook bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Long-poll timeout passed to `getUpdates`.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Pause after a drain that returned no updates.
    #[serde(default = "default_idle_pause_ms")]
    pub idle_pause_ms: u64,
    /// Pause after a failed fetch before retrying.
    #[serde(default = "default_error_pause_secs")]
    pub error_pause_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_poll_timeout_secs() -> u64 {
    100
}

fn default_idle_pause_ms() -> u64 {
    2_000
}

fn default_error_pause_secs() -> u64 {
    5
}

impl IngressSettings {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn idle_pause(&self) -> Duration {
        Duration::from_millis(self.idle_pause_ms)
    }

    pub fn error_pause(&self) -> Duration {
        Duration::from_secs(self.error_pause_secs)
    }
}

impl Default for IngressSettings {
    fn default() -> Self {
        Self {
            mode: IngressMode::default(),
            host: default_host(),
            port: default_port(),
            poll_timeout_secs: default_poll_timeout_secs(),
            idle_pause_ms: default_idle_pause_ms(),
            error_pause_secs: default_error_pause_secs(),
        }
    }
}

/// Telegram Bot API endpoint settings. The token itself is never stored in
/// the config file; it comes from `TELEGRAM_TOKEN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_send_timeout_secs() -> u64 {
    10
}

impl TelegramSettings {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}
