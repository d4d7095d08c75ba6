//! Infrastructure implementations for Storecast.
//!
//! - `dataset` -- CSV loader for the store and schedule tables
//! - `forecast` -- HTTP client for the forecasting service
//! - `telegram` -- Bot API transport and long-poll update source
//! - `config` -- `config.toml` loading and environment overrides

pub mod config;
pub mod dataset;
pub mod forecast;
pub mod telegram;
