//! Forecasting service trait and the prediction client that classifies its
//! results.
//!
//! The trait is the port implemented in `storecast-infra` (HTTP). The client
//! wraps it with a hard timeout and collapses every failure into
//! [`PredictOutcome::ServiceDown`]; callers never see the difference between
//! a network error and a service-side error.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use storecast_types::error::ForecastError;
use storecast_types::outcome::PredictOutcome;
use storecast_types::store::{ForecastPayload, PredictionRow, StoreId};

/// Default bound on a single forecast call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend producing sales predictions from feature rows.
pub trait ForecastService: Send + Sync {
    /// Send one payload and return the per-horizon prediction rows.
    fn forecast(
        &self,
        payload: &ForecastPayload,
    ) -> impl Future<Output = Result<Vec<PredictionRow>, ForecastError>> + Send;
}

/// Single-attempt, time-bounded prediction client.
pub struct PredictionClient<F> {
    service: F,
    timeout: Duration,
}

impl<F> PredictionClient<F> {
    pub fn new(service: F, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn with_default_timeout(service: F) -> Self {
        Self::new(service, DEFAULT_TIMEOUT)
    }

    pub fn service(&self) -> &F {
        &self.service
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<F: ForecastService> PredictionClient<F> {
    /// Request a forecast for `store`. No retry: one failed attempt is final
    /// for this request.
    pub async fn predict(&self, store: StoreId, payload: &ForecastPayload) -> PredictOutcome {
        let result = match tokio::time::timeout(self.timeout, self.service.forecast(payload)).await
        {
            Ok(result) => result.and_then(validate),
            Err(_) => Err(ForecastError::Timeout(self.timeout.as_secs())),
        };

        match result {
            Ok(rows) => {
                debug!(store_id = %store, rows = rows.len(), "forecast received");
                PredictOutcome::Predicted(rows)
            }
            Err(e) => {
                warn!(store_id = %store, error = %e, "forecast service unavailable");
                PredictOutcome::ServiceDown
            }
        }
    }
}

/// Sum of a store's per-horizon predictions.
pub fn total_prediction(rows: &[PredictionRow]) -> f64 {
    rows.iter().map(|row| row.prediction).sum()
}

/// Reject responses that cannot be summed meaningfully.
fn validate(rows: Vec<PredictionRow>) -> Result<Vec<PredictionRow>, ForecastError> {
    if rows.is_empty() {
        return Err(ForecastError::Decode("empty prediction list".to_string()));
    }
    if let Some(row) = rows.iter().find(|row| !row.prediction.is_finite()) {
        return Err(ForecastError::Decode(format!(
            "non-finite prediction {}",
            row.prediction
        )));
    }
    Ok(rows)
}


#[cfg(test)]
mod tests {
    use super::mock::{MockForecast, Script};
    use super::*;
    use crate::dataset::fixtures::{day, store};
    use storecast_types::store::FeatureRow;

    fn payload(id: u32) -> ForecastPayload {
        ForecastPayload::new(vec![FeatureRow::join(
            &day(1, id, "2015-09-17", Some(1.0)),
            &store(id),
        )])
    }

    #[tokio::test]
    async fn test_success_returns_rows() {
        let client = PredictionClient::with_default_timeout(
            MockForecast::new().with(1, Script::Rows(vec![1.5, 2.5])),
        );
        match client.predict(StoreId(1), &payload(1)).await {
            PredictOutcome::Predicted(rows) => {
                assert_eq!(rows.len(), 2);
                assert!((total_prediction(&rows) - 4.0).abs() < f64::EPSILON);
            }
            PredictOutcome::ServiceDown => panic!("expected prediction"),
        }
    }

    #[tokio::test]
    async fn test_error_collapses_to_service_down() {
        let client = PredictionClient::with_default_timeout(
            MockForecast::new().with(1, Script::Fail),
        );
        assert_eq!(
            client.predict(StoreId(1), &payload(1)).await,
            PredictOutcome::ServiceDown
        );
    }

    #[tokio::test]
    async fn test_empty_response_is_service_down() {
        let client = PredictionClient::with_default_timeout(
            MockForecast::new().with(1, Script::Rows(Vec::new())),
        );
        assert_eq!(
            client.predict(StoreId(1), &payload(1)).await,
            PredictOutcome::ServiceDown
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_service_down() {
        let client = PredictionClient::new(
            MockForecast::new().with(1, Script::Hang),
            Duration::from_secs(10),
        );
        assert_eq!(
            client.predict(StoreId(1), &payload(1)).await,
            PredictOutcome::ServiceDown
        );
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let rows = vec![PredictionRow {
            prediction: f64::NAN,
            store: None,
            date: None,
        }];
        assert!(validate(rows).is_err());
    }
}
