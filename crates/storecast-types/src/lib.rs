//! Shared domain types for Storecast.
//!
//! This crate contains the core domain types used across the Storecast bot:
//! store and chat identifiers, dataset rows, forecast payloads, per-store
//! outcomes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod outcome;
pub mod store;
