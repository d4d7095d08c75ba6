//! Per-store classification results and the per-request aggregate.
//!
//! Each decision point of the pipeline has its own closed enum so every
//! consumer matches exhaustively:
//! - [`ResolveResult`] -- dataset lookup (store resolver)
//! - [`PredictOutcome`] -- forecast call (prediction client)
//! - [`StoreOutcome`] -- the final per-store result fed to the aggregator

use serde::{Deserialize, Serialize};

use crate::store::{ForecastPayload, PredictionRow, StoreId};

/// Result of looking a store up in the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResult {
    /// The store is not in the store-reference table.
    NotFound,
    /// The store exists but has no open days in the schedule.
    Closed,
    /// The store has open days; the payload is ready for the forecaster.
    Ready(ForecastPayload),
}

/// Result of calling the forecasting service.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    /// Transport failure, non-success status, timeout, or malformed response.
    ServiceDown,
    /// Per-horizon prediction rows.
    Predicted(Vec<PredictionRow>),
}

/// Final classification for one store of a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreOutcome {
    NotFound,
    Closed,
    ServiceDown,
    /// Sum of the store's per-horizon predictions.
    Predicted { total: f64 },
}

impl StoreOutcome {
    /// Short machine label, used in structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            StoreOutcome::NotFound => "not_found",
            StoreOutcome::Closed => "closed",
            StoreOutcome::ServiceDown => "service_down",
            StoreOutcome::Predicted { .. } => "predicted",
        }
    }

    pub fn total(&self) -> Option<f64> {
        match self {
            StoreOutcome::Predicted { total } => Some(*total),
            StoreOutcome::NotFound | StoreOutcome::Closed | StoreOutcome::ServiceDown => None,
        }
    }
}

/// A store paired with its outcome, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoreReport {
    pub store: StoreId,
    pub outcome: StoreOutcome,
}

/// A store and its predicted total, as ranked in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedStore {
    pub store: StoreId,
    pub total: f64,
}

/// The two best stores of a request and the gap between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopPair {
    pub first: RankedStore,
    pub second: RankedStore,
    /// `first.total - second.total`; never negative.
    pub difference: f64,
}

/// Aggregate view over all outcomes of one request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub valid: usize,
    pub closed: usize,
    pub not_found: usize,
    pub total: f64,
    /// Present only when at least two stores were predicted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<TopPair>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels_are_distinct() {
        let labels = [
            StoreOutcome::NotFound.label(),
            StoreOutcome::Closed.label(),
            StoreOutcome::ServiceDown.label(),
            StoreOutcome::Predicted { total: 1.0 }.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_only_predicted_has_total() {
        assert_eq!(StoreOutcome::Predicted { total: 12.5 }.total(), Some(12.5));
        assert_eq!(StoreOutcome::Closed.total(), None);
        assert_eq!(StoreOutcome::ServiceDown.total(), None);
    }

    #[test]
    fn test_store_outcome_serde_tag() {
        let json = serde_json::to_string(&StoreOutcome::Predicted { total: 3.0 }).unwrap();
        assert!(json.contains("\"kind\":\"predicted\""));
        let json = serde_json::to_string(&StoreOutcome::NotFound).unwrap();
        assert_eq!(json, r#"{"kind":"not_found"}"#);
    }
}
