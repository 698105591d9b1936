//! Error types for data ingestion and export.

/// Errors that can occur while reading or writing data files.
///
/// Only structurally invalid input is an error; unparseable numeric cells
/// become missing values.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A required date cell could not be parsed.
    #[error("invalid date in column {column} at row {row}: {value:?}")]
    InvalidDate {
        /// Column name.
        column: String,
        /// One-based data row.
        row: usize,
        /// Offending cell.
        value: String,
    },

    /// A required identifier cell could not be parsed.
    #[error("invalid identifier in column {column} at row {row}: {value:?}")]
    InvalidIdentifier {
        /// Column name.
        column: String,
        /// One-based data row.
        row: usize,
        /// Offending cell.
        value: String,
    },
}
