//! Application wiring: resolved configuration and the concrete dispatcher.
//!
//! The dispatcher is generic over dataset, forecast service, and transport;
//! the binary pins the first two to the CSV dataset and the HTTP forecast
//! client and picks the transport per command (Telegram or console).

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use storecast_core::dataset::InMemoryDataset;
use storecast_core::ingress::InboundHandler;
use storecast_core::transport::OutboundTransport;
use storecast_core::Dispatcher;
use storecast_infra::config::{
    apply_env_overrides, load_config, process_env, resolve_config_path, telegram_token,
};
use storecast_infra::dataset::load_dataset;
use storecast_infra::forecast::HttpForecastClient;
use storecast_types::config::StorecastConfig;

/// Dispatcher pinned to the infra dataset and forecast client.
pub type BotDispatcher<T> = Dispatcher<InMemoryDataset, HttpForecastClient, T>;

/// Configuration after file loading and environment overrides.
pub struct RuntimeConfig {
    pub config: StorecastConfig,
    pub token: Option<SecretString>,
}

impl RuntimeConfig {
    /// Load `config.toml` and apply environment overrides from the process.
    pub async fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = resolve_config_path(explicit);
        let mut config = load_config(&path).await;
        apply_env_overrides(&mut config, process_env)?;
        tracing::debug!(
            path = %path.display(),
            mode = %config.ingress.mode,
            "configuration loaded"
        );

        Ok(Self {
            config,
            token: telegram_token(process_env),
        })
    }
}

/// Load the dataset and forecast client, then wire a dispatcher around
/// `transport`.
pub fn build_dispatcher<T: OutboundTransport>(
    config: &StorecastConfig,
    transport: T,
) -> anyhow::Result<BotDispatcher<T>> {
    let dataset = load_dataset(&config.dataset).context("failed to load dataset")?;
    let forecast = HttpForecastClient::from_settings(&config.forecast)
        .context("failed to build forecast client")?;

    Ok(Dispatcher::from_config(dataset, forecast, transport, config))
}

/// Shared state of the webhook router.
///
/// Generic over the handler so the HTTP layer can be exercised without a
/// dispatcher behind it.
pub struct AppState<H> {
    pub handler: Arc<H>,
}

impl<H: InboundHandler> AppState<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}
