//! `SQLite` schema definitions for paddock.
//!
//! This module contains the SQL statements for creating and replacing
//! the results table.

/// Name of the results table.
pub const RESULTS_TABLE: &str = "race_results";

/// SQL statement to drop the results table before a full rewrite.
pub const DROP_RESULTS_TABLE: &str = "DROP TABLE IF EXISTS race_results";

/// SQL statement to create the results table.
///
/// Column types are pinned so integer columns read back as integers.
pub const CREATE_RESULTS_TABLE: &str = r"
CREATE TABLE race_results (
    season INTEGER NOT NULL,
    round INTEGER NOT NULL,
    race TEXT NOT NULL,
    date TEXT NOT NULL,
    position INTEGER NOT NULL,
    driver TEXT NOT NULL,
    constructor TEXT NOT NULL,
    points REAL NOT NULL
)
";

/// SQL statement to insert one result row.
pub const INSERT_RESULT: &str = r"
INSERT INTO race_results (season, round, race, date, position, driver, constructor, points)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
";

/// SQL statement to read every row back in insertion order.
pub const SELECT_RESULTS: &str = r"
SELECT season, round, race, date, position, driver, constructor, points
FROM race_results ORDER BY rowid
";

/// SQL statement to check whether the results table exists.
pub const RESULTS_TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";

/// Statements that replace the results table, in order.
pub const REPLACE_STATEMENTS: &[&str] = &[DROP_RESULTS_TABLE, CREATE_RESULTS_TABLE];
