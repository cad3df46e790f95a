//! CSV loading
//!
//! Uploaded files are parsed into a [`DataFrame`] with per-column type
//! inference. A text column named `Month` is reinterpreted as dates.

mod dates;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::io::Read;

use crate::data::{DataError, DataFrame, FloatArray, Result, Series};

pub use dates::parse_date;

/// Name of the column that is treated as a calendar month
pub const MONTH_COLUMN: &str = "Month";

/// Cell contents treated as missing, after trimming
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Load a table from uploaded CSV bytes
pub fn load_table(bytes: &[u8]) -> Result<DataFrame> {
    DataFrame::from_csv_reader(bytes)
}

impl DataFrame {
    /// Parse a CSV document with a header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<DataFrame> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = unique_headers(reader.headers()?.iter());
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(DataError::Csv(format!(
                    "row {} has {} fields, expected {}",
                    row + 1,
                    record.len(),
                    headers.len()
                )));
            }
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        let mut df = DataFrame::new();
        for (name, raw) in headers.into_iter().zip(cells) {
            let mut series = infer_series(&raw);
            if name == MONTH_COLUMN {
                series = coerce_month_dates(series);
            }
            df = df.with_column(name, series)?;
        }

        tracing::debug!(rows = df.nrows(), columns = df.ncols(), "loaded csv table");
        Ok(df)
    }
}

/// Make header names unique: repeats become `name.1`, `name.2`, ...
fn unique_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for header in headers {
        let mut name = header.to_string();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", header, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Infer the narrowest column type that holds every non-missing cell
fn infer_series(raw: &[String]) -> Series {
    let present: Vec<&str> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !is_missing(s))
        .collect();
    let has_missing = present.len() < raw.len();

    if present.is_empty() {
        return Series::Float(FloatArray::from_elem(raw.len(), f64::NAN));
    }

    if !has_missing {
        let ints: Option<Vec<i64>> = present.iter().map(|s| s.parse().ok()).collect();
        if let Some(ints) = ints {
            return Series::int(ints);
        }
    }

    if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        let floats: FloatArray = raw
            .iter()
            .map(|s| {
                if is_missing(s) {
                    f64::NAN
                } else {
                    s.trim().parse::<f64>().unwrap_or(f64::NAN)
                }
            })
            .collect();
        return Series::Float(floats);
    }

    if !has_missing {
        if let Some(bools) = present.iter().map(|s| parse_bool(s)).collect::<Option<Vec<_>>>() {
            return Series::bool(bools);
        }
    }

    Series::text(
        raw.iter()
            .map(|s| (!is_missing(s)).then(|| s.trim().to_string()))
            .collect::<Vec<_>>(),
    )
}

/// Reinterpret a text column as dates; numeric columns are left unchanged
fn coerce_month_dates(series: Series) -> Series {
    match series {
        Series::String(cells) => {
            let dates: Vec<_> = cells
                .iter()
                .map(|cell| cell.as_deref().and_then(parse_date))
                .collect();

            let unparsed = cells
                .iter()
                .zip(dates.iter())
                .filter(|(cell, date)| cell.is_some() && date.is_none())
                .count();
            if unparsed > 0 {
                tracing::warn!(
                    column = MONTH_COLUMN,
                    unparsed,
                    "month cells could not be parsed as dates and are treated as missing"
                );
            }

            Series::date(dates)
        }
        other => other,
    }
}
