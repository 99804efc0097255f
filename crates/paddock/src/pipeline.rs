//! The fetch → store → reload → report pipeline.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::fetch::ResultSource;
use crate::record::RaceResultRecord;
use crate::report::{ReportKind, Reporter};
use crate::storage::Storage;

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Season that was fetched.
    pub season: i32,
    /// Rows written to storage.
    pub written: usize,
    /// Rows read back from storage.
    pub loaded: usize,
    /// Charts written, in rendering order.
    pub charts: Vec<PathBuf>,
}

/// Fetch `season` from `source` and replace the stored table with it.
///
/// Nothing is written if the fetch fails.
///
/// # Errors
///
/// Returns an error if the fetch or the write fails.
pub async fn fetch_and_store(
    source: &dyn ResultSource,
    season: i32,
    storage: &Storage,
) -> Result<usize> {
    let records = source.fetch_season(season).await?;
    info!(
        "Source '{}' returned {} results for {}",
        source.name(),
        records.len(),
        season
    );
    storage.write_results(&records)
}

/// Read the stored table back and render the requested charts.
///
/// # Errors
///
/// Returns an error if the table cannot be read or a chart cannot be written.
pub fn load_and_report(
    storage: &Storage,
    reporter: &Reporter,
    kinds: &[ReportKind],
) -> Result<(Vec<RaceResultRecord>, Vec<PathBuf>)> {
    let records = storage.read_results()?;
    let charts = reporter.render(&records, kinds)?;
    Ok((records, charts))
}

/// Run every stage: fetch, store, reload, render `kinds`.
///
/// Charts are drawn from the reloaded table, not the fetched one.
///
/// # Errors
///
/// Returns the first error from any stage; later stages do not run.
pub async fn run(
    source: &dyn ResultSource,
    season: i32,
    storage: &Storage,
    reporter: &Reporter,
    kinds: &[ReportKind],
) -> Result<RunSummary> {
    let written = fetch_and_store(source, season, storage).await?;
    let (records, charts) = load_and_report(storage, reporter, kinds)?;

    Ok(RunSummary {
        season,
        written,
        loaded: records.len(),
        charts,
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::error::Error;
    use crate::fetch::StaticSource;

    struct FailingSource;

    #[async_trait]
    impl ResultSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_season(&self, _season: i32) -> Result<Vec<RaceResultRecord>> {
            Err(Error::HttpStatus {
                url: "http://example.test/2023/results.json".to_string(),
                status: 500,
            })
        }
    }

    fn record(round: u32, position: u32, driver: &str, points: f64) -> RaceResultRecord {
        RaceResultRecord {
            season: 2023,
            round,
            race: format!("Round {round}"),
            date: NaiveDate::from_ymd_opt(2023, 4, round).unwrap(),
            position,
            driver: driver.to_string(),
            constructor: "Red Bull".to_string(),
            points,
        }
    }

    fn source() -> StaticSource {
        StaticSource::new(vec![
            record(1, 1, "A", 25.0),
            record(1, 2, "B", 18.0),
            record(2, 2, "A", 18.0),
        ])
    }

    #[tokio::test]
    async fn test_fetch_and_store_round_trip() {
        let storage = Storage::open_in_memory().unwrap();
        let written = fetch_and_store(&source(), 2023, &storage).await.unwrap();

        assert_eq!(written, 3);
        let loaded = storage.read_results().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded, source().fetch_season(2023).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_storage_untouched() {
        let storage = Storage::open_in_memory().unwrap();
        fetch_and_store(&source(), 2023, &storage).await.unwrap();

        let err = fetch_and_store(&FailingSource, 2023, &storage)
            .await
            .unwrap_err();
        assert!(err.is_network_error());
        assert_eq!(storage.count().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_creates_no_table() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(fetch_and_store(&FailingSource, 2023, &storage)
            .await
            .is_err());
        assert!(!storage.has_results().unwrap());
    }

    #[test]
    fn test_load_and_report_requires_table() {
        let storage = Storage::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "A", "Red Bull");

        let err = load_and_report(&storage, &reporter, &ReportKind::ALL).unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_run_stops_after_failed_fetch() {
        let storage = Storage::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");
        let reporter = Reporter::new(&out, "A", "Red Bull");

        let err = run(&FailingSource, 2023, &storage, &reporter, &ReportKind::ALL)
            .await
            .unwrap_err();
        assert!(err.is_network_error());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_run_summary_counts() {
        let storage = Storage::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "A", "Red Bull");

        let summary = run(&source(), 2023, &storage, &reporter, &[]).await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                season: 2023,
                written: 3,
                loaded: 3,
                charts: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_load_and_report_without_charts() {
        let storage = Storage::open_in_memory().unwrap();
        fetch_and_store(&source(), 2023, &storage).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "A", "Red Bull");
        let (records, charts) = load_and_report(&storage, &reporter, &[]).unwrap();

        assert_eq!(records.len(), 3);
        assert!(charts.is_empty());
    }
}
