//! Store resolution against the dataset.

use storecast_types::outcome::ResolveResult;
use storecast_types::store::{FeatureRow, ForecastPayload, StoreId};

use crate::dataset::DatasetSource;

/// Classifies a store as not found, closed, or ready for forecasting.
pub struct StoreResolver<D> {
    dataset: D,
}

impl<D: DatasetSource> StoreResolver<D> {
    pub fn new(dataset: D) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Resolve one store.
    ///
    /// 1. Not in the store-reference table -> `NotFound`.
    /// 2. Schedule rows joined with the store record, kept only on open
    ///    days; none left -> `Closed`.
    /// 3. Otherwise -> `Ready` with exactly those rows.
    pub fn resolve(&self, id: StoreId) -> ResolveResult {
        let Some(record) = self.dataset.store(id) else {
            return ResolveResult::NotFound;
        };

        let rows: Vec<FeatureRow> = self
            .dataset
            .schedule(id)
            .iter()
            .filter(|row| row.is_open())
            .map(|row| FeatureRow::join(row, record))
            .collect();

        if rows.is_empty() {
            ResolveResult::Closed
        } else {
            ResolveResult::Ready(ForecastPayload::new(rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryDataset;
    use crate::dataset::fixtures::{day, store};

    fn resolver() -> StoreResolver<InMemoryDataset> {
        StoreResolver::new(InMemoryDataset::new(
            vec![store(1), store(2), store(3)],
            vec![
                day(1, 1, "2015-09-17", Some(1.0)),
                day(2, 1, "2015-09-18", Some(0.0)),
                day(3, 1, "2015-09-19", None),
                day(4, 1, "2015-09-20", Some(1.0)),
                day(5, 2, "2015-09-17", Some(0.0)),
                day(6, 2, "2015-09-18", None),
            ],
        ))
    }

    #[test]
    fn test_unknown_store_is_not_found() {
        assert_eq!(resolver().resolve(StoreId(99)), ResolveResult::NotFound);
    }

    #[test]
    fn test_store_without_open_days_is_closed() {
        assert_eq!(resolver().resolve(StoreId(2)), ResolveResult::Closed);
    }

    #[test]
    fn test_store_without_any_schedule_is_closed() {
        assert_eq!(resolver().resolve(StoreId(3)), ResolveResult::Closed);
    }

    #[test]
    fn test_ready_payload_is_exactly_the_open_subset() {
        let ResolveResult::Ready(payload) = resolver().resolve(StoreId(1)) else {
            panic!("expected Ready");
        };
        let dates: Vec<&str> = payload.rows().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2015-09-17", "2015-09-20"]);
        assert!(payload.rows().iter().all(|r| r.open == 1));
        assert!(payload.rows().iter().all(|r| r.store == StoreId(1)));
        assert_eq!(payload.rows()[0].store_type, "a");
    }
}
