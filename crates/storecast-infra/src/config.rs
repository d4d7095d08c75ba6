//! Configuration loader for Storecast.
//!
//! Reads `config.toml` (from `--config`, `$STORECAST_HOME`, or
//! `~/.storecast/`) into [`StorecastConfig`], then layers environment
//! overrides on top. Falls back to defaults when the file is missing or
//! malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use storecast_types::config::{IngressMode, StorecastConfig};
use storecast_types::error::ConfigError;

pub const ENV_HOME: &str = "STORECAST_HOME";
pub const ENV_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_USE_WEBHOOK: &str = "USE_WEBHOOK";
pub const ENV_PORT: &str = "PORT";
pub const ENV_FORECAST_URL: &str = "FORECAST_API_URL";
pub const ENV_DATA_DIR: &str = "STORECAST_DATA_DIR";

/// Resolve the Storecast home directory.
///
/// `$STORECAST_HOME` wins, then `~/.storecast`, then `./.storecast`.
pub fn resolve_home_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_HOME) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".storecast");
    }

    PathBuf::from(".storecast")
}

/// The config file to read: the explicit path if given, else
/// `{home}/config.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => resolve_home_dir().join("config.toml"),
    }
}

/// Load configuration from `path`.
///
/// - Missing file: [`StorecastConfig::default()`].
/// - Unreadable or unparsable file: a warning, then the default.
pub async fn load_config(path: &Path) -> StorecastConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return StorecastConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return StorecastConfig::default();
        }
    };

    match toml::from_str::<StorecastConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            StorecastConfig::default()
        }
    }
}

/// Apply environment overrides read through `lookup`.
///
/// Unlike a malformed file, a malformed `PORT` is an error: the operator set
/// it explicitly. `USE_WEBHOOK` selects the webhook only when it reads `true`.
pub fn apply_env_overrides<F>(config: &mut StorecastConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_USE_WEBHOOK) {
        // Only "true" selects the webhook; any other value means polling.
        config.ingress.mode = if value.trim().eq_ignore_ascii_case("true") {
            IngressMode::Webhook
        } else {
            IngressMode::Polling
        };
    }

    if let Some(value) = lookup(ENV_PORT) {
        config.ingress.port = value
            .trim()
            .parse()
            .map_err(|_| invalid(ENV_PORT, value.clone()))?;
    }

    if let Some(url) = lookup(ENV_FORECAST_URL).filter(|v| !v.trim().is_empty()) {
        config.forecast.url = url.trim().to_string();
    }

    if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
        config.dataset.dir = PathBuf::from(dir);
    }

    Ok(())
}

/// The bot token from the environment, if set and non-empty.
pub fn telegram_token<F>(lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_TOKEN)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .map(SecretString::from)
}

/// Read a variable from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn invalid(key: &str, value: String) -> ConfigError {
    ConfigError::InvalidEnv {
        key: key.to_string(),
        value,
    }
}
