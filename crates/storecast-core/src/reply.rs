//! Outbound reply texts (Telegram HTML markup).

use storecast_types::config::BotSettings;
use storecast_types::outcome::{AggregateSummary, StoreOutcome, StoreReport};

use crate::format::MoneyFormat;

/// Builds every text the bot sends.
#[derive(Debug, Clone)]
pub struct Replies {
    horizon_weeks: u32,
    money: MoneyFormat,
}

impl Replies {
    pub fn new(horizon_weeks: u32, money: MoneyFormat) -> Self {
        Self {
            horizon_weeks,
            money,
        }
    }

    pub fn from_settings(settings: &BotSettings) -> Self {
        Self::new(
            settings.horizon_weeks,
            MoneyFormat::new(settings.currency_symbol.clone()),
        )
    }

    pub fn money(&self) -> &MoneyFormat {
        &self.money
    }

    pub fn start(&self) -> String {
        format!(
            "<b>👋 Welcome to the Rossmann Sales Forecast Bot</b>\n\n\
             Predict sales for the next <b>{weeks} weeks</b>.\n\n\
             <b>Usage:</b>\n\
             • Single store: 25\n\
             • Multiple stores: 25,3,6,8\n\n\
             ℹ️ Type /help for details.",
            weeks = self.horizon_weeks
        )
    }

    pub fn help(&self) -> String {
        format!(
            "<b>ℹ️ Help</b>\n\n\
             Send one or more store numbers.\n\n\
             <b>Responses:</b>\n\
             💰 Prediction\n\
             🚫 Closed store\n\
             ❓ Store not found\n\
             ⚠️ Forecast service unavailable\n\n\
             📅 Horizon: <b>{weeks} weeks</b>",
            weeks = self.horizon_weeks
        )
    }

    pub fn wait(&self) -> String {
        "⏳ <b>Please wait a few seconds</b> before sending another request.".to_string()
    }

    pub fn invalid_input(&self) -> String {
        "❌ <b>Invalid input.</b> Type /help.".to_string()
    }

    pub fn processing(&self) -> String {
        "⏳ <b>Processing your request...</b>".to_string()
    }

    /// One line per store, shaped by its outcome.
    pub fn store_line(&self, report: &StoreReport) -> String {
        let status = match report.outcome {
            StoreOutcome::NotFound => "❓ <b>not found</b>".to_string(),
            StoreOutcome::Closed => "🚫 <b>closed</b>".to_string(),
            StoreOutcome::ServiceDown => "⚠️ <b>service unavailable</b>".to_string(),
            StoreOutcome::Predicted { total } => {
                format!("💰 <b>{}</b>", self.money.format(total))
            }
        };
        format!("🏪 Store {}: {status}", report.store)
    }

    /// The summary block. Starts with a blank line so it stands apart from
    /// the store lines once joined.
    pub fn summary(&self, summary: &AggregateSummary) -> String {
        let mut text = format!(
            "\n\n<b>📊 Summary</b>\n\
             • Valid predictions: <b>{}</b>\n\
             • Closed stores: <b>{}</b>\n\
             • Not found: <b>{}</b>\n\n\
             💰 <b>Total expected:</b> {}",
            summary.valid,
            summary.closed,
            summary.not_found,
            self.money.format(summary.total)
        );

        if let Some(top) = &summary.top {
            text.push_str(&format!(
                "\n\n🏆 <b>Top store:</b> {} ({})\n\
                 🥈 <b>Second:</b> {} ({})\n\
                 📉 <b>Difference:</b> {}",
                top.first.store,
                self.money.format(top.first.total),
                top.second.store,
                self.money.format(top.second.total),
                self.money.format(top.difference)
            ));
        }

        text
    }
}

impl Default for Replies {
    fn default() -> Self {
        Self::from_settings(&BotSettings::default())
    }
}
