//! Storecast CLI and webhook server entry point.
//!
//! Binary name: `storecast`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then hands
//! off to the command handler.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use storecast_observe::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "storecast", &mut std::io::stdout());
        return Ok(());
    }

    let mut tracing_options =
        TracingOptions::new(TracingOptions::directive_for(cli.verbose, cli.quiet));
    tracing_options.otel = cli.otel;
    init_tracing(&tracing_options)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let runtime = RuntimeConfig::load(cli.config.as_deref()).await?;

    let result = match cli.command {
        Commands::Run { mode, host, port } => {
            let overrides = cli::run::RunOverrides {
                mode: mode.map(Into::into),
                host,
                port,
            };
            cli::run::run(runtime, overrides, cli.quiet).await
        }
        Commands::Ask { text, chat_id } => cli::ask::ask(runtime, text, chat_id, cli.json).await,
        Commands::Check => cli::check::check(&runtime, cli.json),
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

/// Wait for Ctrl+C or SIGTERM.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
