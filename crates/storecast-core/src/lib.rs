//! Message-dispatch pipeline and collaborator trait definitions for Storecast.
//!
//! This crate defines the "ports" (dataset, forecast, transport, and update
//! source traits) that the infrastructure layer implements, plus the
//! pipeline itself. It depends only on `storecast-types` -- never on
//! `storecast-infra` or any HTTP/IO crate.

pub mod aggregate;
pub mod dataset;
pub mod dispatch;
pub mod forecast;
pub mod format;
pub mod ingress;
pub mod input;
pub mod rate_limit;
pub mod reply;
pub mod resolver;
pub mod transport;

pub use dispatch::{Dispatcher, Disposition};
pub use rate_limit::RateLimiter;
