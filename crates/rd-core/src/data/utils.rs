//! Utility types for data operations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column type information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Float,
    Int,
    Bool,
    Text,
    Date,
}

impl ColumnType {
    /// Check if type is numeric
    ///
    /// Booleans count as numeric for model input but not for correlation,
    /// see [`ColumnType::is_number`].
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Int | ColumnType::Bool)
    }

    /// Check if type holds plain numbers (floats or integers)
    pub fn is_number(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Int)
    }

    /// Check if type is temporal
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Float => write!(f, "float64"),
            ColumnType::Int => write!(f, "int64"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Text => write!(f, "string"),
            ColumnType::Date => write!(f, "date"),
        }
    }
}
