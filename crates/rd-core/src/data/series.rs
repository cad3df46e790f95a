//! Series data structure for holding homogeneous data
//!
//! A Series is a one-dimensional column of a DataFrame. Missing values are
//! represented as `NaN` in float columns and as `None` in text and date
//! columns; integer and boolean columns never contain missing values.

use super::*;

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// A Series is a typed, one-dimensional array of data
#[derive(Clone, Debug, PartialEq)]
pub enum Series {
    /// Floating point numbers (f64), `NaN` marks a missing cell
    Float(FloatArray),
    /// Integer numbers (i64)
    Int(IntArray),
    /// Boolean values
    Bool(BoolArray),
    /// Text values
    String(TextArray),
    /// Calendar dates
    Date(DateArray),
}

impl Series {
    /// Create a new Float series
    pub fn float(data: impl Into<FloatArray>) -> Self {
        Series::Float(data.into())
    }

    /// Create a new Int series
    pub fn int(data: impl Into<IntArray>) -> Self {
        Series::Int(data.into())
    }

    /// Create a new Bool series
    pub fn bool(data: impl Into<BoolArray>) -> Self {
        Series::Bool(data.into())
    }

    /// Create a new String series without missing cells
    pub fn string<T: AsRef<str>>(data: &[T]) -> Self {
        Series::String(data.iter().map(|s| Some(s.as_ref().to_string())).collect())
    }

    /// Create a new String series that may contain missing cells
    pub fn text(data: impl Into<TextArray>) -> Self {
        Series::String(data.into())
    }

    /// Create a new Date series
    pub fn date(data: impl Into<DateArray>) -> Self {
        Series::Date(data.into())
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        match self {
            Series::Float(arr) => arr.len(),
            Series::Int(arr) => arr.len(),
            Series::Bool(arr) => arr.len(),
            Series::String(arr) => arr.len(),
            Series::Date(arr) => arr.len(),
        }
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name of the series
    pub fn dtype(&self) -> &'static str {
        match self {
            Series::Float(_) => "float64",
            Series::Int(_) => "int64",
            Series::Bool(_) => "bool",
            Series::String(_) => "string",
            Series::Date(_) => "date",
        }
    }

    /// Get the column type of the series
    pub fn column_type(&self) -> ColumnType {
        match self {
            Series::Float(_) => ColumnType::Float,
            Series::Int(_) => ColumnType::Int,
            Series::Bool(_) => ColumnType::Bool,
            Series::String(_) => ColumnType::Text,
            Series::Date(_) => ColumnType::Date,
        }
    }

    /// Whether the series can be fed to a model without encoding
    pub fn is_numeric(&self) -> bool {
        self.column_type().is_numeric()
    }

    /// Get a value at index
    pub fn get(&self, idx: usize) -> Option<SeriesValue> {
        if idx >= self.len() {
            return None;
        }

        let value = match self {
            Series::Float(arr) if arr[idx].is_nan() => SeriesValue::Missing,
            Series::Float(arr) => SeriesValue::Float(arr[idx]),
            Series::Int(arr) => SeriesValue::Int(arr[idx]),
            Series::Bool(arr) => SeriesValue::Bool(arr[idx]),
            Series::String(arr) => arr[idx]
                .as_ref()
                .map_or(SeriesValue::Missing, |s| SeriesValue::String(s.clone())),
            Series::Date(arr) => arr[idx].map_or(SeriesValue::Missing, SeriesValue::Date),
        };

        Some(value)
    }

    /// Check whether the cell at `idx` is missing
    pub fn is_missing(&self, idx: usize) -> bool {
        matches!(self.get(idx), Some(SeriesValue::Missing))
    }

    /// Per-row missing flags
    pub fn missing_mask(&self) -> Vec<bool> {
        match self {
            Series::Float(arr) => arr.iter().map(|v| v.is_nan()).collect(),
            Series::Int(arr) => vec![false; arr.len()],
            Series::Bool(arr) => vec![false; arr.len()],
            Series::String(arr) => arr.iter().map(Option::is_none).collect(),
            Series::Date(arr) => arr.iter().map(Option::is_none).collect(),
        }
    }

    /// Number of missing cells
    pub fn null_count(&self) -> usize {
        self.missing_mask().into_iter().filter(|&m| m).count()
    }

    /// Filter the series with a boolean mask
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.len()),
                actual: format!("mask length {}", mask.len()),
            });
        }

        fn keep<T: Clone>(values: impl Iterator<Item = T>, mask: &[bool]) -> Vec<T> {
            values
                .zip(mask.iter())
                .filter(|(_, keep)| **keep)
                .map(|(val, _)| val)
                .collect()
        }

        match self {
            Series::Float(arr) => Ok(Series::Float(keep(arr.iter().copied(), mask).into())),
            Series::Int(arr) => Ok(Series::Int(keep(arr.iter().copied(), mask).into())),
            Series::Bool(arr) => Ok(Series::Bool(keep(arr.iter().copied(), mask).into())),
            Series::String(arr) => Ok(Series::String(keep(arr.iter().cloned(), mask))),
            Series::Date(arr) => Ok(Series::Date(keep(arr.iter().copied(), mask))),
        }
    }

    /// Convert a numeric series to floats
    pub fn to_float(&self) -> Result<FloatArray> {
        match self {
            Series::Float(arr) => Ok(arr.clone()),
            Series::Int(arr) => Ok(arr.mapv(|v| v as f64)),
            Series::Bool(arr) => Ok(arr.mapv(|v| if v { 1.0 } else { 0.0 })),
            Series::String(_) => Err(DataError::NonNumericData("string")),
            Series::Date(_) => Err(DataError::NonNumericData("date")),
        }
    }

    /// Coerce any series to floats, turning failures into `NaN`
    ///
    /// Text cells are parsed as numbers after trimming; dates have no numeric
    /// reading and always become missing.
    pub fn coerce_numeric(&self) -> FloatArray {
        match self {
            Series::String(arr) => arr
                .iter()
                .map(|cell| {
                    cell.as_deref()
                        .and_then(|s| s.trim().parse::<f64>().ok())
                        .unwrap_or(f64::NAN)
                })
                .collect(),
            Series::Date(arr) => FloatArray::from_elem(arr.len(), f64::NAN),
            numeric => numeric
                .to_float()
                .unwrap_or_else(|_| FloatArray::from_elem(numeric.len(), f64::NAN)),
        }
    }

    /// Encode the non-missing values as category codes
    ///
    /// Categories are the distinct non-missing values sorted
    /// lexicographically; missing cells have no code.
    pub fn categorize(&self) -> (Vec<Option<u32>>, Vec<String>) {
        let labels: Vec<Option<String>> = match self {
            Series::String(arr) => arr.clone(),
            other => (0..other.len())
                .map(|i| match other.get(i) {
                    Some(SeriesValue::Missing) | None => None,
                    Some(value) => Some(value.to_string()),
                })
                .collect(),
        };

        let mut categories: Vec<String> = labels
            .iter()
            .flatten()
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        // Sort categories for consistent encoding
        categories.sort();

        let category_map: HashMap<&str, u32> = categories
            .iter()
            .enumerate()
            .map(|(i, cat)| (cat.as_str(), i as u32))
            .collect();

        let codes = labels
            .iter()
            .map(|label| {
                label
                    .as_deref()
                    .and_then(|s| category_map.get(s).copied())
            })
            .collect();

        (codes, categories)
    }

    /// Compute the mean of the non-missing values of a numeric series
    pub fn mean(&self) -> Result<f64> {
        let values = self.to_float()?;
        let (sum, count) = values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));

        if count == 0 {
            Ok(f64::NAN)
        } else {
            Ok(sum / count as f64)
        }
    }

    /// Compute the maximum of the non-missing values of a numeric series
    pub fn max(&self) -> Result<f64> {
        let values = self.to_float()?;
        Ok(values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(f64::NAN, |acc, &v| if acc.is_nan() { v } else { acc.max(v) }))
    }
}

/// Enum for type-safe value access
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    String(String),
    Date(NaiveDate),
    Missing,
}

impl std::fmt::Display for SeriesValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesValue::Float(v) => write!(f, "{}", v),
            SeriesValue::Int(v) => write!(f, "{}", v),
            SeriesValue::Bool(v) => write!(f, "{}", v),
            SeriesValue::String(v) => write!(f, "{}", v),
            SeriesValue::Date(v) => write!(f, "{}", v),
            SeriesValue::Missing => write!(f, "NaN"),
        }
    }
}
