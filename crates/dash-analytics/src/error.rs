//! Analytics error types.

use dash_domain::DomainError;
use thiserror::Error;

/// Analytics errors.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// DuckDB error
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Query construction error
    #[error("Query error: {0}")]
    Query(String),

    /// Data conversion error
    #[error("Data conversion error: {0}")]
    Conversion(String),

    /// Invalid selection or parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The input file lacks columns the dataset requires
    #[error("{dataset} data is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Dataset name
        dataset: String,
        /// Absent column names
        columns: Vec<String>,
    },

    /// A query referenced a column the dataset does not declare
    #[error("Unknown column '{column}' for {dataset} data")]
    UnknownColumn {
        /// Dataset name
        dataset: String,
        /// Offending column
        column: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DomainError> for AnalyticsError {
    fn from(err: DomainError) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Conversion(err.to_string())
    }
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
