//! Push-mode ingress: the webhook server as an [`Ingress`] adapter.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use storecast_core::ingress::{InboundHandler, Ingress};
use storecast_types::config::IngressSettings;
use storecast_types::error::IngressError;

use crate::http::router::build_router;
use crate::state::AppState;

/// Serves the webhook router until shutdown.
#[derive(Debug, Clone)]
pub struct WebhookIngress {
    addr: String,
}

impl WebhookIngress {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
        }
    }

    pub fn from_settings(settings: &IngressSettings) -> Self {
        Self::new(&settings.host, settings.port)
    }
}

impl Ingress for WebhookIngress {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn run<H: InboundHandler>(
        self,
        handler: Arc<H>,
        shutdown: CancellationToken,
    ) -> Result<(), IngressError> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| IngressError::Bind {
                addr: self.addr.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(addr = %self.addr, "webhook server listening");

        axum::serve(listener, build_router(AppState::new(handler)))
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|e| IngressError::Server(e.to_string()))?;

        tracing::info!("webhook server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storecast_types::chat::InboundMessage;

    struct NoopHandler;

    impl InboundHandler for NoopHandler {
        async fn handle(&self, _message: InboundMessage) {}
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let shutdown = CancellationToken::new();
        let ingress = WebhookIngress::new("127.0.0.1", 0);
        let task = tokio::spawn(ingress.run(Arc::new(NoopHandler), shutdown.clone()));

        shutdown.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = WebhookIngress::new("127.0.0.1", port)
            .run(Arc::new(NoopHandler), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, IngressError::Bind { .. }));
    }
}
