//! CSV dataset loader.
//!
//! Reads the store reference table and the schedule table once, at startup,
//! into an [`InMemoryDataset`]. Column headers follow the Rossmann files and
//! map onto the serde names of [`StoreRecord`] and [`ScheduleRow`].

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;

use storecast_core::dataset::InMemoryDataset;
use storecast_types::config::DatasetSettings;
use storecast_types::error::DatasetError;
use storecast_types::store::{ScheduleRow, StoreRecord};

/// Load both tables from the configured directory.
pub fn load_dataset(settings: &DatasetSettings) -> Result<InMemoryDataset, DatasetError> {
    let stores: Vec<StoreRecord> = read_table(&settings.store_path())?;
    let schedule: Vec<ScheduleRow> = read_table(&settings.test_path())?;

    tracing::info!(
        stores = stores.len(),
        schedule_rows = schedule.len(),
        dir = %settings.dir.display(),
        "dataset loaded"
    );

    Ok(InMemoryDataset::new(stores, schedule))
}

/// Deserialize every row of a headed CSV file.
///
/// Empty cells become `None` for optional columns. The first malformed row
/// aborts the load with its line number.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::Missing(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| io_error(path, &err))?;

    let headers = reader
        .headers()
        .map_err(|err| io_error(path, &err))?
        .clone();

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => return Err(parse_error(path, &err, line_of(&err))),
        }
        let line = record.position().map_or(0, |pos| pos.line());
        let row = record
            .deserialize(Some(&headers))
            .map_err(|err| parse_error(path, &err, line))?;
        rows.push(row);
    }

    Ok(rows)
}

fn io_error(path: &Path, err: &csv::Error) -> DatasetError {
    DatasetError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn parse_error(path: &Path, err: &csv::Error, line: u64) -> DatasetError {
    DatasetError::Parse {
        path: path.to_path_buf(),
        line,
        message: err.to_string(),
    }
}

fn line_of(err: &csv::Error) -> u64 {
    err.position().map_or(0, |pos| pos.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storecast_core::dataset::DatasetSource;
    use storecast_types::store::StoreId;
    use tempfile::TempDir;

    const STORE_CSV: &str = "\
Store,StoreType,Assortment,CompetitionDistance,CompetitionOpenSinceMonth,CompetitionOpenSinceYear,Promo2,Promo2SinceWeek,Promo2SinceYear,PromoInterval
1,c,a,1270,9,2008,0,,,
2,a,a,570,11,2007,1,13,2010,\"Jan,Apr,Jul,Oct\"
";

    const TEST_CSV: &str = "\
Id,Store,DayOfWeek,Date,Open,Promo,StateHoliday,SchoolHoliday
1,1,4,2015-09-17,1.0,1,0,0
2,1,3,2015-09-16,0,1,0,0
3,2,4,2015-09-17,,1,0,0
";

    fn settings(dir: &TempDir) -> DatasetSettings {
        DatasetSettings {
            dir: dir.path().to_path_buf(),
            ..DatasetSettings::default()
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_load_dataset_indexes_by_store() {
        let dir = TempDir::new().unwrap();
        write(&dir, "store.csv", STORE_CSV);
        write(&dir, "test.csv", TEST_CSV);

        let dataset = load_dataset(&settings(&dir)).unwrap();

        assert_eq!(dataset.store_count(), 2);
        assert_eq!(dataset.schedule_rows(), 3);
        assert_eq!(dataset.open_rows(), 1);

        let store = dataset.store(StoreId(1)).unwrap();
        assert_eq!(store.store_type, "c");
        assert_eq!(store.competition_distance, Some(1270.0));
        assert_eq!(store.promo2_since_week, None);
        assert_eq!(store.promo_interval, None);

        let promo = dataset.store(StoreId(2)).unwrap();
        assert_eq!(promo.promo_interval.as_deref(), Some("Jan,Apr,Jul,Oct"));

        let schedule = dataset.schedule(StoreId(2));
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].open, None);
        assert!(!schedule[0].is_open());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        write(&dir, "store.csv", STORE_CSV);

        match load_dataset(&settings(&dir)) {
            Err(DatasetError::Missing(path)) => assert!(path.ends_with("test.csv")),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "test.csv",
            "Id,Store,DayOfWeek,Date,Open,Promo,StateHoliday,SchoolHoliday\n\
             1,1,4,2015-09-17,1,1,0,0\n\
             2,abc,4,2015-09-17,1,1,0,0\n",
        );

        match read_table::<ScheduleRow>(&dir.path().join("test.csv")) {
            Err(DatasetError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
