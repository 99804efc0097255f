//! Error types for paddock.
//!
//! This module defines all error types used throughout the paddock crate,
//! grouped by the pipeline stage that raises them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for paddock operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Network Errors ===
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request could not be sent or the response body could not be read.
    #[error("request to {url} failed: {source}")]
    Network {
        /// The requested URL.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The results API answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    // === Parse Errors ===
    /// The response had an unexpected shape or value.
    #[error("malformed results payload: {message}")]
    Parse {
        /// Description of what could not be parsed.
        message: String,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database file does not exist.
    #[error("no database found at {path}; run `paddock fetch` first")]
    DatabaseNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The database exists but holds no results table.
    #[error("table '{table}' not found in database")]
    TableNotFound {
        /// Name of the missing table.
        table: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Output Errors ===
    /// A chart could not be drawn or written.
    #[error("failed to render chart {path}: {message}")]
    Render {
        /// Destination of the chart.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for paddock operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a render error for the chart at `path`.
    #[must_use]
    pub fn render(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Render {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Check if this error came from the network layer.
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::ClientBuild(_) | Self::Network { .. } | Self::HttpStatus { .. }
        )
    }

    /// Check if this error means the payload could not be understood.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Json(_))
    }

    /// Check if this error means stored data is missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DatabaseNotFound { .. } | Self::TableNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = Error::parse("round 3: position 'R' is not an integer");
        assert_eq!(
            err.to_string(),
            "malformed results payload: round 3: position 'R' is not an integer"
        );
        assert!(err.is_parse_error());
        assert!(!err.is_network_error());
    }

    #[test]
    fn test_http_status_display() {
        let err = Error::HttpStatus {
            url: "http://example.test/2023/results.json".to_string(),
            status: 503,
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("2023/results.json"));
        assert!(err.is_network_error());
    }

    #[test]
    fn test_not_found_classification() {
        let err = Error::TableNotFound {
            table: "race_results",
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "table 'race_results' not found in database");

        let err = Error::DatabaseNotFound {
            path: PathBuf::from("/tmp/missing.db"),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/tmp/missing.db"));

        assert!(!Error::parse("x").is_not_found());
    }

    #[test]
    fn test_render_error_display() {
        let err = Error::render("/tmp/charts/podium_counts.svg", "font not found");
        let msg = err.to_string();
        assert!(msg.contains("podium_counts.svg"));
        assert!(msg.contains("font not found"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
            assert!(err.is_parse_error());
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "result_limit must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("result_limit"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
