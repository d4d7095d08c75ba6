//! `storecast check` -- configuration and dataset status.

use anyhow::Context;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use storecast_core::dataset::InMemoryDataset;
use storecast_infra::dataset::load_dataset;
use storecast_types::config::StorecastConfig;

use crate::state::RuntimeConfig;

/// What `check` reports.
#[derive(Debug, serde::Serialize)]
pub struct StatusReport {
    pub version: &'static str,
    pub dataset_dir: String,
    pub stores: usize,
    pub schedule_rows: usize,
    pub open_rows: usize,
    pub forecast_url: String,
    pub ingress_mode: String,
    pub listen: String,
    pub token_configured: bool,
}

impl StatusReport {
    pub fn new(
        config: &StorecastConfig,
        dataset: &InMemoryDataset,
        token_configured: bool,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            dataset_dir: config.dataset.dir.display().to_string(),
            stores: dataset.store_count(),
            schedule_rows: dataset.schedule_rows(),
            open_rows: dataset.open_rows(),
            forecast_url: config.forecast.url.clone(),
            ingress_mode: config.ingress.mode.to_string(),
            listen: format!("{}:{}", config.ingress.host, config.ingress.port),
            token_configured,
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Setting").fg(Color::White),
            Cell::new("Value").fg(Color::White),
        ]);

        let token = if self.token_configured {
            Cell::new("set").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Red)
        };

        table.add_row(vec![Cell::new("Dataset"), Cell::new(&self.dataset_dir)]);
        table.add_row(vec![Cell::new("Stores"), Cell::new(self.stores)]);
        table.add_row(vec![Cell::new("Schedule rows"), Cell::new(self.schedule_rows)]);
        table.add_row(vec![Cell::new("Open rows"), Cell::new(self.open_rows)]);
        table.add_row(vec![Cell::new("Forecast URL"), Cell::new(&self.forecast_url)]);
        table.add_row(vec![Cell::new("Ingress"), Cell::new(&self.ingress_mode)]);
        table.add_row(vec![Cell::new("Listen"), Cell::new(&self.listen)]);
        table.add_row(vec![Cell::new("Telegram token"), token]);
        table
    }
}

pub fn check(runtime: &RuntimeConfig, json: bool) -> anyhow::Result<()> {
    let dataset = load_dataset(&runtime.config.dataset).context("failed to load dataset")?;
    let report = StatusReport::new(&runtime.config, &dataset, runtime.token.is_some());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Storecast v{}",
        style("⚡").bold(),
        report.version
    );
    println!();
    println!("{}", report.table());
    println!();
    Ok(())
}
