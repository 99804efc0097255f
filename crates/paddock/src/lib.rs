//! `paddock` - Fetch, store and chart a season of motorsport race results
//!
//! This library provides the pipeline behind the `paddock` binary: a
//! [`ResultSource`] fetches a season from an Ergast-compatible API, [`Storage`]
//! replaces and reloads the local `SQLite` table, and [`Reporter`] renders the
//! season charts.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use fetch::{ErgastSource, ResultSource, StaticSource};
pub use logging::init_logging;
pub use record::RaceResultRecord;
pub use report::{ReportKind, Reporter};
pub use storage::{Storage, StorageStats};
