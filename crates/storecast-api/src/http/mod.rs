//! HTTP layer for webhook mode.
//!
//! A small axum server: liveness at `/` and `/health`, Telegram updates at
//! `POST /webhook`. [`ingress::WebhookIngress`] runs it as an ingress
//! adapter until shutdown.

pub mod error;
pub mod handlers;
pub mod ingress;
pub mod router;
