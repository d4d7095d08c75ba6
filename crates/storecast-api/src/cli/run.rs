//! `storecast run` -- start the bot on Telegram.

use std::sync::Arc;

use anyhow::Context;
use console::style;
use tokio_util::sync::CancellationToken;

use storecast_core::ingress::{InboundHandler, Ingress, PollingIngress};
use storecast_infra::telegram::TelegramClient;
use storecast_types::config::IngressMode;

use crate::http::ingress::WebhookIngress;
use crate::state::{RuntimeConfig, build_dispatcher};

/// Command-line overrides for the ingress section.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub mode: Option<IngressMode>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Load everything, then serve until Ctrl+C / SIGTERM.
pub async fn run(
    mut runtime: RuntimeConfig,
    overrides: RunOverrides,
    quiet: bool,
) -> anyhow::Result<()> {
    let ingress = &mut runtime.config.ingress;
    if let Some(mode) = overrides.mode {
        ingress.mode = mode;
    }
    if let Some(host) = overrides.host {
        ingress.host = host;
    }
    if let Some(port) = overrides.port {
        ingress.port = port;
    }

    let config = runtime.config;
    let telegram = TelegramClient::from_token(runtime.token, &config.telegram)
        .context("TELEGRAM_TOKEN must be set to run the bot")?;
    let dispatcher = Arc::new(build_dispatcher(&config, telegram.clone())?);

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            crate::shutdown_signal().await;
            tracing::info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    if !quiet {
        println!(
            "  {} Storecast {} ({} mode)",
            style("⚡").bold(),
            env!("CARGO_PKG_VERSION"),
            style(config.ingress.mode).cyan()
        );
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }

    match config.ingress.mode {
        IngressMode::Polling => {
            serve(PollingIngress::new(telegram, &config.ingress), dispatcher, shutdown).await?
        }
        IngressMode::Webhook => {
            serve(WebhookIngress::from_settings(&config.ingress), dispatcher, shutdown).await?
        }
    }

    if !quiet {
        println!("\n  Bot stopped.");
    }
    Ok(())
}

async fn serve<I: Ingress, H: InboundHandler>(
    ingress: I,
    handler: Arc<H>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let name = ingress.name();
    tracing::info!(ingress = name, "starting ingress");
    ingress
        .run(handler, shutdown)
        .await
        .with_context(|| format!("{name} ingress failed"))
}
