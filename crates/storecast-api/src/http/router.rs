//! Axum router configuration with middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use storecast_core::ingress::InboundHandler;

use crate::http::handlers;
use crate::state::AppState;

/// Build the webhook-mode router.
pub fn build_router<H: InboundHandler>(state: AppState<H>) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/webhook", post(handlers::webhook::receive_update::<H>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
