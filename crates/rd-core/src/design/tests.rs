//! Tests for design matrix construction

use super::*;
use crate::data::{DataFrame, Series};
use approx::assert_abs_diff_eq;
use chrono::NaiveDate;

// ==================== Test Fixtures ====================

/// Monthly sales with a price predictor
fn sales_data() -> DataFrame {
    let months: Vec<Option<NaiveDate>> = (1..=12)
        .map(|m| NaiveDate::from_ymd_opt(2023, m, 1))
        .collect();

    DataFrame::new()
        .with_column(MONTH_COLUMN, Series::date(months))
        .unwrap()
        .with_column(
            "Price",
            Series::float(vec![
                10.0, 11.0, 10.5, 12.0, 11.5, 13.0, 12.5, 14.0, 13.5, 15.0, 14.5, 16.0,
            ]),
        )
        .unwrap()
        .with_column(
            "Sales",
            Series::float(vec![
                200.0, 195.0, 205.0, 190.0, 198.0, 185.0, 192.0, 180.0, 186.0, 175.0, 181.0, 170.0,
            ]),
        )
        .unwrap()
}

/// Mixed numeric/text predictors with gaps
fn mixed_data() -> DataFrame {
    DataFrame::new()
        .with_column(
            "region",
            Series::text(vec![
                Some("north".to_string()),
                Some("south".to_string()),
                Some("east".to_string()),
                None,
                Some("south".to_string()),
                Some("east".to_string()),
            ]),
        )
        .unwrap()
        .with_column("x", Series::float(vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]))
        .unwrap()
        .with_column(
            "y",
            Series::string(&["1.5", "2.5", "3.5", "4.5", "oops", "6.5"]),
        )
        .unwrap()
}

fn binary_data(target: Vec<f64>) -> DataFrame {
    let n = target.len();
    DataFrame::new()
        .with_column("x", Series::float((0..n).map(|i| i as f64).collect::<Vec<_>>()))
        .unwrap()
        .with_column("won", Series::float(target))
        .unwrap()
}

// ==================== Builder Tests ====================

#[test]
fn test_build_linear_with_month() {
    let df = sales_data();
    let design = build(&df, "Sales", &["Price", "Month"], ModelKind::MultipleLinear).unwrap();

    assert_eq!(design.columns, vec!["const", "Price", "Month"]);
    assert_eq!(design.x.dim(), (12, 3));
    assert_eq!(design.y.len(), 12);

    // Intercept column is all ones
    assert!(design.x.column(0).iter().all(|&v| v == 1.0));

    // Month reduced to 1..=12
    let months: Vec<f64> = design.x.column(2).to_vec();
    assert_eq!(months, (1..=12).map(|m| m as f64).collect::<Vec<_>>());
}

#[test]
fn test_build_filters_missing_rows_consistently() {
    let df = mixed_data();
    let design = build(&df, "y", &["region", "x"], ModelKind::MultipleLinear).unwrap();

    // Row 2 (x missing), row 3 (region missing) and row 4 (y not numeric) are dropped
    assert_eq!(design.nobs(), 3);
    assert_eq!(design.y.to_vec(), vec![1.5, 2.5, 6.5]);
    assert_eq!(design.x.nrows(), design.y.len());
    assert!(design.x.iter().all(|v| !v.is_nan()));
    assert!(design.y.iter().all(|v| !v.is_nan()));
}

#[test]
fn test_build_one_hot_order_and_count() {
    let df = mixed_data();
    let design = build(&df, "y", &["region", "x"], ModelKind::MultipleLinear).unwrap();

    // Three categories give two indicators; numeric predictors come first
    assert_eq!(design.columns, vec!["const", "x", "region_north", "region_south"]);
    assert_eq!(design.inputs, vec!["x", "region_north", "region_south"]);

    // Rows kept: north, south, east
    assert_eq!(design.x.column(2).to_vec(), vec![1.0, 0.0, 0.0]);
    assert_eq!(design.x.column(3).to_vec(), vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_build_polynomial_single_predictor() {
    let df = sales_data();
    let kind = ModelKind::polynomial(2).unwrap();
    let design = build(&df, "Sales", &["Price"], kind).unwrap();

    assert_eq!(design.columns, vec!["const", "Price", "Price^2"]);
    assert_eq!(design.x.ncols(), 3);
    assert_abs_diff_eq!(design.x[(0, 2)], 100.0, epsilon = 1e-12);
    assert_eq!(design.inputs, vec!["Price"]);
    assert!(design.expansion.is_some());
}

#[test]
fn test_build_polynomial_degree_bounds() {
    assert!(matches!(
        ModelKind::polynomial(1),
        Err(DesignError::InvalidDegree { degree: 1, .. })
    ));
    assert!(matches!(
        ModelKind::polynomial(6),
        Err(DesignError::InvalidDegree { degree: 6, .. })
    ));

    let df = sales_data();
    let result = build(&df, "Sales", &["Price"], ModelKind::Polynomial { degree: 9 });
    assert!(matches!(result, Err(DesignError::InvalidDegree { .. })));
}

#[test]
fn test_build_logistic_accepts_binary_target() {
    let df = binary_data(vec![0.0, 1.0, 0.0, 1.0, f64::NAN, 1.0]);
    let design = build(&df, "won", &["x"], ModelKind::Logistic).unwrap();

    assert_eq!(design.nobs(), 5);
    assert!(design.y.iter().all(|&v| v == 0.0 || v == 1.0));
    assert_eq!(design.columns, vec!["const", "x"]);
}

#[test]
fn test_build_logistic_rejects_non_binary_target() {
    let df = binary_data(vec![0.0, 1.0, 2.0, 1.0]);
    let result = build(&df, "won", &["x"], ModelKind::Logistic);

    match result {
        Err(DesignError::NonBinaryTarget { column, values }) => {
            assert_eq!(column, "won");
            assert_eq!(values, vec![0.0, 1.0, 2.0]);
        }
        other => panic!("expected NonBinaryTarget, got {:?}", other),
    }
}

#[test]
fn test_build_empty_after_filter() {
    let df = DataFrame::new()
        .with_column("x", Series::float(vec![f64::NAN, 1.0]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0, f64::NAN]))
        .unwrap();

    let result = build(&df, "y", &["x"], ModelKind::MultipleLinear);
    assert!(matches!(result, Err(DesignError::EmptyDataset { dropped: 2 })));
}

#[test]
fn test_build_selection_errors() {
    let df = sales_data();
    let none: [&str; 0] = [];

    assert!(matches!(
        build(&df, "Sales", &none, ModelKind::MultipleLinear),
        Err(DesignError::NoPredictors)
    ));
    assert!(matches!(
        build(&df, "Sales", &["Sales"], ModelKind::MultipleLinear),
        Err(DesignError::InvalidSelection { .. })
    ));
    assert!(matches!(
        build(&df, "Sales", &["Nope"], ModelKind::MultipleLinear),
        Err(DesignError::Data(_))
    ));
}

#[test]
fn test_build_rejects_date_target() {
    let df = sales_data();
    let result = build(&df, "Month", &["Price"], ModelKind::MultipleLinear);
    assert!(matches!(
        result,
        Err(DesignError::NonNumericTarget { dtype: "date", .. })
    ));
}

#[test]
fn test_build_single_category_yields_no_predictors() {
    let df = DataFrame::new()
        .with_column("g", Series::string(&["a", "a", "a"]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0, 2.0, 3.0]))
        .unwrap();

    let result = build(&df, "y", &["g"], ModelKind::MultipleLinear);
    assert!(matches!(result, Err(DesignError::NoPredictors)));
}

#[test]
fn test_feature_row_expands_polynomial() {
    let df = sales_data();
    let design = build(&df, "Sales", &["Price"], ModelKind::polynomial(3).unwrap()).unwrap();

    let row = design.feature_row(&[2.0]).unwrap();
    assert_eq!(row.to_vec(), vec![1.0, 2.0, 4.0, 8.0]);

    assert!(matches!(
        design.feature_row(&[1.0, 2.0]),
        Err(DesignError::FeatureCount { expected: 1, actual: 2 })
    ));
}

#[test]
fn test_input_means() {
    let df = sales_data();
    let design = build(&df, "Sales", &["Price", "Month"], ModelKind::MultipleLinear).unwrap();

    let means = design.input_means();
    assert_eq!(means[1].0, "Month");
    assert_abs_diff_eq!(means[1].1, 6.5, epsilon = 1e-12);
}

#[test]
fn test_model_kind_labels() {
    assert_eq!("Multiple Linear".parse::<ModelKind>().unwrap(), ModelKind::MultipleLinear);
    assert_eq!(
        "polynomial".parse::<ModelKind>().unwrap(),
        ModelKind::Polynomial { degree: 2 }
    );
    assert_eq!("Logistic".parse::<ModelKind>().unwrap(), ModelKind::Logistic);
    assert!("ridge".parse::<ModelKind>().is_err());
    assert_eq!(ModelKind::Polynomial { degree: 3 }.to_string(), "Polynomial (degree 3)");
}

// ==================== Property Tests ====================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn cell() -> impl Strategy<Value = f64> {
        prop_oneof![4 => -100.0f64..100.0, 1 => Just(f64::NAN)]
    }

    fn category() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            4 => prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(|s| Some(s.to_string())),
            1 => Just(None),
        ]
    }

    proptest! {
        #[test]
        fn test_rows_aligned_and_complete(
            rows in prop::collection::vec((cell(), cell(), category()), 1..40)
        ) {
            let df = DataFrame::new()
                .with_column("x", Series::float(rows.iter().map(|r| r.0).collect::<Vec<_>>()))
                .unwrap()
                .with_column("y", Series::float(rows.iter().map(|r| r.1).collect::<Vec<_>>()))
                .unwrap()
                .with_column("g", Series::text(rows.iter().map(|r| r.2.clone()).collect::<Vec<_>>()))
                .unwrap();

            match build(&df, "y", &["x", "g"], ModelKind::MultipleLinear) {
                Ok(design) => {
                    prop_assert_eq!(design.x.nrows(), design.y.len());
                    prop_assert_eq!(design.input_matrix.nrows(), design.y.len());
                    prop_assert!(design.x.iter().all(|v| !v.is_nan()));
                    prop_assert!(design.y.iter().all(|v| !v.is_nan()));
                }
                Err(DesignError::EmptyDataset { .. }) | Err(DesignError::NoPredictors) => {}
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        #[test]
        fn test_one_hot_yields_k_minus_one(labels in prop::collection::vec(0usize..6, 1..30)) {
            let names: Vec<String> = labels.iter().map(|l| format!("c{}", l)).collect();
            let k = names.iter().collect::<std::collections::HashSet<_>>().len();

            let encoded = encoding::one_hot("g", &Series::string(&names));
            prop_assert_eq!(encoded.len(), k - 1);
        }

        #[test]
        fn test_build_is_deterministic(
            values in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 3..20),
            degree in 2u32..=5,
        ) {
            let df = DataFrame::new()
                .with_column("x", Series::float(values.iter().map(|v| v.0).collect::<Vec<_>>()))
                .unwrap()
                .with_column("y", Series::float(values.iter().map(|v| v.1).collect::<Vec<_>>()))
                .unwrap();

            let kind = ModelKind::polynomial(degree).unwrap();
            let first = build(&df, "y", &["x"], kind).unwrap();
            let second = build(&df, "y", &["x"], kind).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
