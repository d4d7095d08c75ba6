//! Dataset source trait and its in-memory table implementation.
//!
//! The dataset is two keyed tables: store reference records (one per store)
//! and schedule rows (one per store and day). Loading from disk lives in
//! `storecast-infra`; the core only reads.

use std::collections::HashMap;

use storecast_types::store::{ScheduleRow, StoreId, StoreRecord};

/// Read access to the per-store and per-day tables.
///
/// Lookups are synchronous and in-memory; implementations must not block.
pub trait DatasetSource: Send + Sync {
    /// The store's reference record, if the store exists.
    fn store(&self, id: StoreId) -> Option<&StoreRecord>;

    /// All schedule rows of the store, in dataset order. Empty when the store
    /// has no schedule.
    fn schedule(&self, id: StoreId) -> &[ScheduleRow];
}

/// Dataset held fully in memory, indexed by store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    stores: HashMap<StoreId, StoreRecord>,
    schedule: HashMap<StoreId, Vec<ScheduleRow>>,
}

impl InMemoryDataset {
    /// Index the two tables by store. Later duplicates of a store record
    /// replace earlier ones; schedule rows keep their relative order.
    pub fn new(stores: Vec<StoreRecord>, schedule: Vec<ScheduleRow>) -> Self {
        let stores = stores
            .into_iter()
            .map(|record| (record.store, record))
            .collect();

        let mut by_store: HashMap<StoreId, Vec<ScheduleRow>> = HashMap::new();
        for row in schedule {
            by_store.entry(row.store).or_default().push(row);
        }

        Self {
            stores,
            schedule: by_store,
        }
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    pub fn schedule_rows(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }

    pub fn open_rows(&self) -> usize {
        self.schedule
            .values()
            .flatten()
            .filter(|row| row.is_open())
            .count()
    }
}

impl DatasetSource for InMemoryDataset {
    fn store(&self, id: StoreId) -> Option<&StoreRecord> {
        self.stores.get(&id)
    }

    fn schedule(&self, id: StoreId) -> &[ScheduleRow] {
        self.schedule.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<D: DatasetSource + ?Sized> DatasetSource for std::sync::Arc<D> {
    fn store(&self, id: StoreId) -> Option<&StoreRecord> {
        (**self).store(id)
    }

    fn schedule(&self, id: StoreId) -> &[ScheduleRow] {
        (**self).schedule(id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn store(id: u32) -> StoreRecord {
        StoreRecord {
            store: StoreId(id),
            store_type: "a".to_string(),
            assortment: "c".to_string(),
            competition_distance: Some(1270.0),
            competition_open_since_month: Some(9),
            competition_open_since_year: Some(2008),
            promo2: 0,
            promo2_since_week: None,
            promo2_since_year: None,
            promo_interval: None,
        }
    }

    pub fn day(row_id: u32, store: u32, date: &str, open: Option<f64>) -> ScheduleRow {
        ScheduleRow {
            id: row_id,
            store: StoreId(store),
            day_of_week: 4,
            date: date.to_string(),
            open,
            promo: 1,
            state_holiday: "0".to_string(),
            school_holiday: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{day, store};
    use super::*;

    #[test]
    fn test_lookup_and_grouping() {
        let dataset = InMemoryDataset::new(
            vec![store(1), store(2)],
            vec![
                day(1, 1, "2015-09-17", Some(1.0)),
                day(2, 2, "2015-09-17", Some(0.0)),
                day(3, 1, "2015-09-16", Some(1.0)),
            ],
        );

        assert_eq!(dataset.store_count(), 2);
        assert_eq!(dataset.schedule_rows(), 3);
        assert_eq!(dataset.open_rows(), 2);
        assert!(dataset.store(StoreId(1)).is_some());
        assert!(dataset.store(StoreId(3)).is_none());

        let rows = dataset.schedule(StoreId(1));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2015-09-17");
        assert_eq!(rows[1].date, "2015-09-16");
    }

    #[test]
    fn test_store_without_schedule_has_empty_slice() {
        let dataset = InMemoryDataset::new(vec![store(7)], Vec::new());
        assert!(dataset.schedule(StoreId(7)).is_empty());
        assert!(dataset.schedule(StoreId(8)).is_empty());
    }
}
