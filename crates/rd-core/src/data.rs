//! Core data structures for RegDash
//!
//! This module provides the tabular structures that uploaded datasets are
//! loaded into and that the design-matrix builder reads from.

mod dataframe;
mod series;
mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use dataframe::DataFrame;
pub use series::{Series, SeriesValue};
pub use utils::ColumnType;

// Type aliases for common use cases
pub type FloatArray = ndarray::Array1<f64>;
pub type IntArray = ndarray::Array1<i64>;
pub type BoolArray = ndarray::Array1<bool>;
pub type TextArray = Vec<Option<String>>;
pub type DateArray = Vec<Option<chrono::NaiveDate>>;
pub type Matrix = ndarray::Array2<f64>;

/// Error types specific to data operations
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Operation requires numeric data, got {0}")]
    NonNumericData(&'static str),

    #[error("Failed to parse CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv(err.to_string())
    }
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
