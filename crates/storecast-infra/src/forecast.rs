//! HttpForecastClient -- concrete [`ForecastService`] over the forecasting
//! service's JSON endpoint.
//!
//! The request body is the array of feature rows; the response is an array
//! of prediction records with at least a `prediction` field.

use std::time::Duration;

use storecast_core::forecast::ForecastService;
use storecast_types::config::ForecastSettings;
use storecast_types::error::ForecastError;
use storecast_types::store::{ForecastPayload, PredictionRow};

/// Forecasting service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpForecastClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpForecastClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn from_settings(settings: &ForecastSettings) -> Result<Self, ForecastError> {
        Self::new(settings.url.clone(), settings.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ForecastService for HttpForecastClient {
    async fn forecast(
        &self,
        payload: &ForecastPayload,
    ) -> Result<Vec<PredictionRow>, ForecastError> {
        tracing::debug!(url = %self.url, rows = payload.len(), "posting forecast request");

        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ForecastError::Timeout(self.timeout.as_secs())
                } else {
                    ForecastError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<PredictionRow>>()
            .await
            .map_err(|e| ForecastError::Decode(format!("failed to parse response: {e}")))
    }
}
