//! Result sources for paddock.
//!
//! A [`ResultSource`] turns a season number into a flat list of
//! [`RaceResultRecord`]s. The production source talks to an Ergast-compatible
//! HTTP API; [`StaticSource`] serves a fixed record set.

mod ergast;

pub use ergast::{flatten_response, ErgastSource, DEFAULT_BASE_URL, DEFAULT_RESULT_LIMIT};

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::record::RaceResultRecord;

/// Anything that can produce a season's race results.
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// The name of this source (for logging).
    fn name(&self) -> &'static str;

    /// Fetch every result of `season`, flattened to one record per finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or its data cannot be
    /// parsed. No retry is attempted.
    async fn fetch_season(&self, season: i32) -> Result<Vec<RaceResultRecord>>;
}

/// A source backed by an in-memory record set.
///
/// Only records whose `season` matches the request are returned.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RaceResultRecord>,
}

impl StaticSource {
    /// Create a source serving the given records.
    #[must_use]
    pub fn new(records: Vec<RaceResultRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ResultSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_season(&self, season: i32) -> Result<Vec<RaceResultRecord>> {
        let records: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.season == season)
            .cloned()
            .collect();
        debug!("Static source served {} records for {}", records.len(), season);
        Ok(records)
    }
}
