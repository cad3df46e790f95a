//! Tests for CSV loading

use super::*;
use crate::data::{ColumnType, SeriesValue};

#[test]
fn test_load_infers_column_types() {
    let csv = "id,price,label,flag\n1,2.5,a,true\n2,3.0,b,False\n3,4,a,TRUE\n";
    let df = load_table(csv.as_bytes()).unwrap();

    assert_eq!(df.shape(), (3, 4));
    assert_eq!(df.column("id").unwrap().column_type(), ColumnType::Int);
    assert_eq!(df.column("price").unwrap().column_type(), ColumnType::Float);
    assert_eq!(df.column("label").unwrap().column_type(), ColumnType::Text);
    assert_eq!(df.column("flag").unwrap().column_type(), ColumnType::Bool);
}

#[test]
fn test_load_missing_cells() {
    let csv = "x,y,name\n1,,a\nNA,2,\n3,4,c\n";
    let df = load_table(csv.as_bytes()).unwrap();

    // Integers with gaps widen to floats
    let x = df.column("x").unwrap();
    assert_eq!(x.column_type(), ColumnType::Float);
    assert!(x.is_missing(1));
    assert!(df.column("y").unwrap().is_missing(0));
    assert!(df.column("name").unwrap().is_missing(1));
    assert_eq!(x.null_count(), 1);
}

#[test]
fn test_load_month_column_becomes_dates() {
    let csv = "Month,Sales\n2023-01-01,10\n2023-02-01,12\ngarbage,9\n";
    let df = load_table(csv.as_bytes()).unwrap();

    let month = df.column(MONTH_COLUMN).unwrap();
    assert_eq!(month.column_type(), ColumnType::Date);
    assert!(matches!(month.get(0), Some(SeriesValue::Date(_))));
    assert!(month.is_missing(2));
}

#[test]
fn test_load_numeric_month_is_left_numeric() {
    let csv = "Month,Sales\n1,10\n2,12\n";
    let df = load_table(csv.as_bytes()).unwrap();

    assert_eq!(df.column(MONTH_COLUMN).unwrap().column_type(), ColumnType::Int);
}

#[test]
fn test_load_duplicate_headers_are_renamed() {
    let csv = "a,a,b,a\n1,2,3,4\n";
    let df = load_table(csv.as_bytes()).unwrap();

    assert_eq!(df.column_names(), vec!["a", "a.1", "b", "a.2"]);
}

#[test]
fn test_load_ragged_rows_fail() {
    let csv = "a,b\n1,2\n3\n";
    assert!(matches!(load_table(csv.as_bytes()), Err(DataError::Csv(_))));
}

#[test]
fn test_load_header_only() {
    let df = load_table(b"a,b\n").unwrap();
    assert_eq!(df.shape(), (0, 2));
}

#[test]
fn test_load_trims_text_cells() {
    let csv = "region,sales\n north,1\nnorth ,2\nsouth,3\n";
    let df = load_table(csv.as_bytes()).unwrap();

    let region = df.column("region").unwrap();
    assert!(matches!(region.get(0), Some(SeriesValue::String(s)) if s == "north"));

    let (codes, categories) = region.categorize();
    assert_eq!(categories, vec!["north", "south"]);
    assert_eq!(codes, vec![Some(0), Some(0), Some(1)]);
}
