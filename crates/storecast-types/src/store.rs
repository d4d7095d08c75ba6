//! Store identifiers, dataset rows, and the forecast request/response schema.
//!
//! Column names follow the Rossmann dataset (`store.csv`, `test.csv`) and are
//! kept verbatim on the wire so the forecasting service receives exactly the
//! columns it was trained on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a retail store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub u32);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the store-reference table (`store.csv`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreRecord {
    pub store: StoreId,
    pub store_type: String,
    pub assortment: String,
    pub competition_distance: Option<f64>,
    pub competition_open_since_month: Option<u32>,
    pub competition_open_since_year: Option<u32>,
    pub promo2: u8,
    pub promo2_since_week: Option<u32>,
    pub promo2_since_year: Option<u32>,
    pub promo_interval: Option<String>,
}

/// One row of the schedule table (`test.csv`): a store on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleRow {
    pub id: u32,
    pub store: StoreId,
    pub day_of_week: u8,
    pub date: String,
    /// `1` when the store opens that day. Empty cells mean unknown and are
    /// treated as closed.
    pub open: Option<f64>,
    pub promo: u8,
    pub state_holiday: String,
    pub school_holiday: u8,
}

impl ScheduleRow {
    pub fn is_open(&self) -> bool {
        matches!(self.open, Some(flag) if flag == 1.0)
    }
}

/// A schedule row joined with its store's reference attributes.
///
/// This is the explicit schema of one element of the forecast request body.
/// The schedule row's `Id` is deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureRow {
    pub store: StoreId,
    pub day_of_week: u8,
    pub date: String,
    pub open: u8,
    pub promo: u8,
    pub state_holiday: String,
    pub school_holiday: u8,
    pub store_type: String,
    pub assortment: String,
    pub competition_distance: Option<f64>,
    pub competition_open_since_month: Option<u32>,
    pub competition_open_since_year: Option<u32>,
    pub promo2: u8,
    pub promo2_since_week: Option<u32>,
    pub promo2_since_year: Option<u32>,
    pub promo_interval: Option<String>,
}

impl FeatureRow {
    /// Left-join a schedule row with its store record.
    pub fn join(schedule: &ScheduleRow, store: &StoreRecord) -> Self {
        Self {
            store: schedule.store,
            day_of_week: schedule.day_of_week,
            date: schedule.date.clone(),
            open: u8::from(schedule.is_open()),
            promo: schedule.promo,
            state_holiday: schedule.state_holiday.clone(),
            school_holiday: schedule.school_holiday,
            store_type: store.store_type.clone(),
            assortment: store.assortment.clone(),
            competition_distance: store.competition_distance,
            competition_open_since_month: store.competition_open_since_month,
            competition_open_since_year: store.competition_open_since_year,
            promo2: store.promo2,
            promo2_since_week: store.promo2_since_week,
            promo2_since_year: store.promo2_since_year,
            promo_interval: store.promo_interval.clone(),
        }
    }
}

/// Request body sent to the forecasting service: a JSON array of feature rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastPayload {
    rows: Vec<FeatureRow>,
}

impl ForecastPayload {
    pub fn new(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One element of the forecasting service's response.
///
/// Only `prediction` is required; the service may echo identifying columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub prediction: f64,
    #[serde(rename = "Store", default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreId>,
    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
