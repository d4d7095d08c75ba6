//! CLI command definitions for the `storecast` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod check;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use storecast_types::config::IngressMode;

/// Telegram bot answering sales-forecast questions about retail stores.
#[derive(Parser)]
#[command(name = "storecast", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (default: $STORECAST_HOME/config.toml or ~/.storecast/config.toml).
    #[arg(long, global = true, env = "STORECAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the bot with the configured ingress.
    Run {
        /// Override the ingress mode from config / USE_WEBHOOK.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Webhook listen address.
        #[arg(long)]
        host: Option<String>,

        /// Webhook listen port.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one message through the dispatcher and print the replies.
    Ask {
        /// Message text, e.g. "25, 3" or "/help".
        text: String,

        /// Chat the message appears to come from.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        chat_id: i64,
    },

    /// Load config and dataset and print a status overview.
    Check,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Ingress mode as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Polling,
    Webhook,
}

impl From<ModeArg> for IngressMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Polling => IngressMode::Polling,
            ModeArg::Webhook => IngressMode::Webhook,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "storecast", "-vv", "run", "--mode", "webhook", "--port", "8080",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run { mode, host, port } => {
                assert_eq!(mode, Some(ModeArg::Webhook));
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_ask_with_negative_chat() {
        let cli =
            Cli::try_parse_from(["storecast", "ask", "25,3", "--chat-id", "-100123"]).unwrap();
        match cli.command {
            Commands::Ask { text, chat_id } => {
                assert_eq!(text, "25,3");
                assert_eq!(chat_id, -100123);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["storecast", "check", "--json", "--quiet"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Check));
    }
}
