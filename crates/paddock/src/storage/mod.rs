//! Storage layer for paddock.
//!
//! This module provides `SQLite`-based persistence for a season's results.
//! Every write replaces the whole `race_results` table; reads return the
//! rows in the order they were written.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::RaceResultRecord;

use schema::{
    INSERT_RESULT, REPLACE_STATEMENTS, RESULTS_TABLE, RESULTS_TABLE_EXISTS, SELECT_RESULTS,
};

/// Date format used for the `date` column.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage engine for race results.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or database cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Open a database that must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseNotFound`] if there is no file at `path`, or an
    /// error if it cannot be opened.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::DatabaseNotFound { path });
        }

        debug!("Opening existing database at {}", path.display());
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the results table with `records`.
    ///
    /// Any previous contents of the table are discarded. Returns the number of
    /// rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn write_results(&self, records: &[RaceResultRecord]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;

        for statement in REPLACE_STATEMENTS {
            tx.execute(statement, [])?;
        }

        {
            let mut stmt = tx.prepare(INSERT_RESULT)?;
            for record in records {
                stmt.execute(params![
                    record.season,
                    record.round,
                    record.race,
                    record.date.format(DATE_FORMAT).to_string(),
                    record.position,
                    record.driver,
                    record.constructor,
                    record.points,
                ])?;
            }
        }

        tx.commit()?;
        info!(
            "Wrote {} results to {} in {}",
            records.len(),
            RESULTS_TABLE,
            self.path.display()
        );
        Ok(records.len())
    }

    /// Load every stored result, in the order it was written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNotFound`] if nothing has been written yet, or an
    /// error if the database operation fails.
    pub fn read_results(&self) -> Result<Vec<RaceResultRecord>> {
        self.ensure_results_table()?;

        let mut stmt = self.conn.prepare(SELECT_RESULTS)?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Read {} results from {}", records.len(), RESULTS_TABLE);
        Ok(records)
    }

    /// Whether the results table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn has_results(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(RESULTS_TABLE_EXISTS, [RESULTS_TABLE], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Count stored results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNotFound`] if nothing has been written yet, or an
    /// error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        self.ensure_results_table()?;
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM race_results", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// An absent results table is reported as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        if !self.has_results()? {
            return Ok(StorageStats {
                total_results: 0,
                races: 0,
                seasons: Vec::new(),
                db_size_bytes,
            });
        }

        let total_results = self.count()?;
        let races: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM (SELECT DISTINCT season, round FROM race_results)",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT season FROM race_results ORDER BY season")?;
        let seasons = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i32>, _>>()?;

        Ok(StorageStats {
            total_results,
            races,
            seasons,
            db_size_bytes,
        })
    }

    fn ensure_results_table(&self) -> Result<()> {
        if self.has_results()? {
            Ok(())
        } else {
            Err(Error::TableNotFound {
                table: RESULTS_TABLE,
            })
        }
    }

    /// Convert a database row to a record.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<RaceResultRecord> {
        let date_str: String = row.get(3)?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
        })?;

        Ok(RaceResultRecord {
            season: row.get(0)?,
            round: row.get(1)?,
            race: row.get(2)?,
            date,
            position: row.get(4)?,
            driver: row.get(5)?,
            constructor: row.get(6)?,
            points: row.get(7)?,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of results stored.
    pub total_results: i64,
    /// Number of distinct races stored.
    pub races: i64,
    /// Seasons present, ascending.
    pub seasons: Vec<i32>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
