//! Tests for data module

use super::*;
use approx::assert_abs_diff_eq;
use chrono::NaiveDate;

#[test]
fn test_series_creation() {
    // Test float series
    let float_series = Series::float(vec![1.0, 2.0, 3.0]);
    assert_eq!(float_series.len(), 3);
    assert_eq!(float_series.dtype(), "float64");

    // Test int series
    let int_series = Series::int(vec![1, 2, 3]);
    assert_eq!(int_series.len(), 3);
    assert_eq!(int_series.dtype(), "int64");

    // Test bool series
    let bool_series = Series::bool(vec![true, false, true]);
    assert_eq!(bool_series.len(), 3);
    assert_eq!(bool_series.dtype(), "bool");

    // Test string series
    let string_series = Series::string(&["a", "b"]);
    assert_eq!(string_series.len(), 2);
    assert_eq!(string_series.dtype(), "string");

    // Test date series
    let date_series = Series::date(vec![NaiveDate::from_ymd_opt(2024, 3, 1), None]);
    assert_eq!(date_series.len(), 2);
    assert_eq!(date_series.dtype(), "date");
    assert!(date_series.column_type().is_temporal());
}

#[test]
fn test_series_missing_values() {
    let series = Series::float(vec![1.0, f64::NAN, 3.0]);
    assert_eq!(series.null_count(), 1);
    assert_eq!(series.missing_mask(), vec![false, true, false]);
    assert_eq!(series.get(1), Some(SeriesValue::Missing));

    let text = Series::text(vec![Some("a".to_string()), None]);
    assert!(text.is_missing(1));
    assert_eq!(text.get(0), Some(SeriesValue::String("a".to_string())));
    assert_eq!(text.get(5), None);
}

#[test]
fn test_series_statistics() {
    let series = Series::float(vec![1.0, 2.0, f64::NAN, 5.0]);

    assert_abs_diff_eq!(series.mean().unwrap(), 8.0 / 3.0, epsilon = 1e-12);
    assert_eq!(series.max().unwrap(), 5.0);

    let ints = Series::int(vec![3, 9, 4]);
    assert_eq!(ints.max().unwrap(), 9.0);

    assert!(Series::string(&["x"]).mean().is_err());
    assert!(Series::float(vec![f64::NAN]).max().unwrap().is_nan());
}

#[test]
fn test_series_conversion() {
    let bools = Series::bool(vec![true, false]);
    assert_eq!(bools.to_float().unwrap().to_vec(), vec![1.0, 0.0]);

    assert!(matches!(
        Series::string(&["1"]).to_float(),
        Err(DataError::NonNumericData("string"))
    ));

    let coerced = Series::string(&[" 1.5", "abc", "2"]).coerce_numeric();
    assert_eq!(coerced[0], 1.5);
    assert!(coerced[1].is_nan());
    assert_eq!(coerced[2], 2.0);

    let dates = Series::date(vec![NaiveDate::from_ymd_opt(2024, 1, 1)]).coerce_numeric();
    assert!(dates[0].is_nan());
}

#[test]
fn test_series_categorize() {
    let series = Series::text(vec![
        Some("b".to_string()),
        None,
        Some("a".to_string()),
        Some("b".to_string()),
    ]);
    let (codes, categories) = series.categorize();

    assert_eq!(categories, vec!["a", "b"]);
    assert_eq!(codes, vec![Some(1), None, Some(0), Some(1)]);
}

#[test]
fn test_series_filter() {
    let series = Series::int(vec![10, 20, 30, 40]);

    let filtered = series.filter(&[true, false, false, true]).unwrap();
    assert_eq!(filtered.to_float().unwrap().to_vec(), vec![10.0, 40.0]);
    assert!(series.filter(&[true]).is_err());
}

#[test]
fn test_dataframe_creation() {
    let df = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0])),
        ("y", Series::int(vec![4, 5, 6])),
    ])
    .unwrap();

    assert_eq!(df.shape(), (3, 2));
    assert_eq!(df.column_names(), vec!["x", "y"]);
}

#[test]
fn test_dataframe_builder() {
    let df = DataFrame::new()
        .with_column("a", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_column("b", Series::string(&["u", "v"]))
        .unwrap();

    assert_eq!(df.shape(), (2, 2));
    assert_eq!(df.numeric_column_names(), vec!["a"]);

    let duplicate = DataFrame::new()
        .with_column("a", Series::float(vec![1.0]))
        .unwrap()
        .with_column("a", Series::float(vec![2.0]));
    assert!(matches!(duplicate, Err(DataError::DuplicateColumn(_))));

    let ragged = DataFrame::new()
        .with_column("a", Series::float(vec![1.0]))
        .unwrap()
        .with_column("b", Series::float(vec![1.0, 2.0]));
    assert!(matches!(ragged, Err(DataError::DimensionMismatch { .. })));
}

#[test]
fn test_dataframe_select_and_filter() {
    let df = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0])),
        ("y", Series::int(vec![4, 5, 6])),
        ("z", Series::string(&["a", "b", "c"])),
    ])
    .unwrap();

    let selected = df.select(["z", "x"]).unwrap();
    assert_eq!(selected.column_names(), vec!["z", "x"]);
    assert!(matches!(
        df.select(["missing"]),
        Err(DataError::ColumnNotFound(_))
    ));

    let filtered = df.filter(&[true, false, true]).unwrap();
    assert_eq!(filtered.nrows(), 2);
    assert_eq!(
        filtered.column("y").unwrap().to_float().unwrap().to_vec(),
        vec![4.0, 6.0]
    );
}

#[test]
fn test_dataframe_replace_column() {
    let mut df = DataFrame::from_columns(vec![
        ("a", Series::int(vec![1, 2])),
        ("b", Series::int(vec![3, 4])),
    ])
    .unwrap();

    df.replace_column("a", Series::float(vec![0.5, 0.5])).unwrap();
    assert_eq!(df.column("a").unwrap().dtype(), "float64");
    assert_eq!(df.column_names(), vec!["a", "b"]);

    assert!(df.replace_column("a", Series::float(vec![1.0])).is_err());
    assert!(df.replace_column("c", Series::float(vec![1.0, 2.0])).is_err());
}

#[test]
fn test_dataframe_corr() {
    let df = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0, 4.0])),
        ("y", Series::float(vec![2.0, 4.0, 6.0, 8.0])),
        ("z", Series::float(vec![4.0, 3.0, 2.0, f64::NAN])),
        ("label", Series::string(&["a", "b", "c", "d"])),
        ("flat", Series::int(vec![1, 1, 1, 1])),
    ])
    .unwrap();

    let corr = df.corr().unwrap();
    assert_eq!(corr.dim(), (4, 4));

    assert_abs_diff_eq!(corr[(0, 1)], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(corr[(0, 2)], -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(corr[(2, 0)], corr[(0, 2)], epsilon = 1e-12);
    assert!(corr[(0, 3)].is_nan());
}
