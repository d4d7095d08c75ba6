//! Observability for Storecast: subscriber setup and OpenTelemetry bridge.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, TracingOptions, init_tracing, shutdown_tracing};
