//! Predictor encodings applied before the row filter

use chrono::Datelike;

use crate::data::{FloatArray, Series};
use crate::io::parse_date;

/// Reduce a month column to its calendar month number (1-12)
///
/// Dates map to their month, text is parsed as a date first, and numbers are
/// kept when they already are a whole month number. Anything else becomes
/// missing.
pub fn month_numbers(series: &Series) -> FloatArray {
    fn month_of(value: f64) -> f64 {
        if value.fract() == 0.0 && (1.0..=12.0).contains(&value) {
            value
        } else {
            f64::NAN
        }
    }

    match series {
        Series::Date(dates) => dates
            .iter()
            .map(|d| d.map_or(f64::NAN, |d| d.month() as f64))
            .collect(),
        Series::String(cells) => cells
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .and_then(parse_date)
                    .map_or(f64::NAN, |d| d.month() as f64)
            })
            .collect(),
        Series::Float(values) => values.mapv(month_of),
        Series::Int(values) => values.mapv(|v| month_of(v as f64)),
        Series::Bool(values) => FloatArray::from_elem(values.len(), f64::NAN),
    }
}

/// One-hot encode a column, dropping the first (reference) category
///
/// Returns one `{name}_{category}` indicator per non-reference category.
/// Rows whose value is missing get `NaN` in every indicator so the row filter
/// removes them.
pub fn one_hot(name: &str, series: &Series) -> Vec<(String, FloatArray)> {
    let (codes, categories) = series.categorize();

    categories
        .iter()
        .enumerate()
        .skip(1)
        .map(|(code, category)| {
            let indicator: FloatArray = codes
                .iter()
                .map(|c| match c {
                    Some(c) if *c as usize == code => 1.0,
                    Some(_) => 0.0,
                    None => f64::NAN,
                })
                .collect();
            (format!("{}_{}", name, category), indicator)
        })
        .collect()
}
