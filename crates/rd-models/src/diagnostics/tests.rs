//! Tests for model diagnostics

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use ndarray::{array, Array1, Array2};

use rd_core::data::{DataFrame, Series};
use rd_core::design::{build, ModelKind};

use super::residuals::{cooks_distance, histogram, jarque_bera, qq_plot};
use super::*;
use crate::fit::fit;

// ==================== Test Fixtures ====================

/// y = 1 + 2 x1 + 3 x2 plus a small deterministic disturbance
fn regression_data() -> DataFrame {
    let n = 20;
    let x1: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let x2: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
    let y: Vec<f64> = (0..n)
        .map(|i| 1.0 + 2.0 * x1[i] + 3.0 * x2[i] + 0.1 * (7.0 * i as f64).cos())
        .collect();
    let region: Vec<Option<String>> = (0..n)
        .map(|i| Some(if i % 2 == 0 { "east" } else { "west" }.to_string()))
        .collect();
    let label: Vec<f64> = (0..n)
        .map(|i| if (i * 7) % 10 < 5 { 0.0 } else { 1.0 })
        .collect();
    let months: Vec<Option<NaiveDate>> = (0..n)
        .map(|i| NaiveDate::from_ymd_opt(2023, (i % 12) as u32 + 1, 1))
        .collect();

    DataFrame::new()
        .with_column("x1", Series::float(x1))
        .unwrap()
        .with_column("x2", Series::float(x2))
        .unwrap()
        .with_column("region", Series::text(region))
        .unwrap()
        .with_column("Month", Series::date(months))
        .unwrap()
        .with_column("label", Series::float(label))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn pearson(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    let (ma, mb) = (a.mean().unwrap(), b.mean().unwrap());
    let da = a - ma;
    let db = b - mb;
    da.dot(&db) / (da.dot(&da).sqrt() * db.dot(&db).sqrt())
}

// ==================== VIF ====================

#[test]
fn test_vif_two_predictors() {
    let x1 = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let x2 = array![2.0, 1.0, 4.0, 3.0, 6.0, 4.0];
    let mut x = Array2::ones((6, 3));
    x.column_mut(1).assign(&x1);
    x.column_mut(2).assign(&x2);

    let entries = vif::vif(&x, &names(&["const", "x1", "x2"]), 1e-10);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].variable, "x1");

    // With one other predictor plus a constant, VIF = 1 / (1 - r²)
    let r = pearson(&x1, &x2);
    let expected = 1.0 / (1.0 - r * r);
    assert_abs_diff_eq!(entries[1].vif().unwrap(), expected, epsilon = 1e-8);
    assert_abs_diff_eq!(entries[2].vif().unwrap(), expected, epsilon = 1e-8);

    match &entries[1].outcome {
        VifOutcome::Computed { vif, tolerance } => {
            assert_abs_diff_eq!(*tolerance, 1.0 / vif, epsilon = 1e-12)
        }
        VifOutcome::Failed { reason } => panic!("unexpected failure: {}", reason),
    }

    // The intercept's auxiliary regression is uncentered
    assert!(entries[0].vif().unwrap() > 1.0);
}

#[test]
fn test_vif_collinear_columns() {
    let x = array![
        [1.0, 1.0, 2.0],
        [1.0, 2.0, 4.0],
        [1.0, 3.0, 6.0],
        [1.0, 4.0, 8.0],
        [1.0, 5.0, 10.0]
    ];

    let entries = vif::vif(&x, &names(&["const", "a", "b"]), 1e-10);
    assert_eq!(entries.len(), 3);

    // const regressed on two proportional columns is singular
    assert!(matches!(entries[0].outcome, VifOutcome::Failed { .. }));
    // a and b are exact multiples of each other
    for entry in &entries[1..] {
        let v = entry.vif();
        assert!(v.is_none() || v.unwrap().is_infinite());
    }
}

// ==================== Correlation ====================

#[test]
fn test_correlation_uses_numeric_predictors() {
    let df = regression_data();
    match correlation(&df, &["x1", "region", "Month", "x2"]).unwrap() {
        Correlation::Matrix { columns, values } => {
            assert_eq!(columns, names(&["x1", "x2"]));
            assert_eq!(values.dim(), (2, 2));
            assert_abs_diff_eq!(values[(0, 0)], 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(values[(0, 1)], values[(1, 0)], epsilon = 1e-15);
        }
        Correlation::Unavailable { notice } => panic!("{}", notice),
    }
}

#[test]
fn test_correlation_without_numeric_predictors() {
    let df = regression_data();
    assert!(matches!(
        correlation(&df, &["region", "Month"]).unwrap(),
        Correlation::Unavailable { .. }
    ));
    assert!(correlation(&df, &["missing"]).is_err());
}

// ==================== Residual Pieces ====================

#[test]
fn test_qq_plot() {
    let residuals = array![0.3, -0.1, 0.5, -0.7];
    let qq = qq_plot(&residuals).unwrap();

    assert_eq!(qq.sample, vec![-0.7, -0.1, 0.3, 0.5]);
    assert_abs_diff_eq!(qq.theoretical[0], -qq.theoretical[3], epsilon = 1e-12);
    assert_abs_diff_eq!(qq.theoretical[1], -qq.theoretical[2], epsilon = 1e-12);
    assert!(qq.theoretical[0] < qq.theoretical[1]);
    assert_abs_diff_eq!(qq.intercept, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(qq.slope, residuals.std(0.0), epsilon = 1e-12);
}

#[test]
fn test_jarque_bera_symmetric() {
    let residuals = array![-2.0, -1.0, 0.0, 1.0, 2.0];
    let normality = jarque_bera(&residuals).unwrap();

    assert_abs_diff_eq!(normality.skewness, 0.0, epsilon = 1e-12);
    // Uniform-like sample: m4 / m2² = 6.8 / 4 = 1.7
    assert_abs_diff_eq!(normality.kurtosis, 1.7 - 3.0, epsilon = 1e-12);
    let expected = 5.0 / 6.0 * (1.3_f64 * 1.3 / 4.0);
    assert_abs_diff_eq!(normality.jarque_bera, expected, epsilon = 1e-12);
    assert!(normality.p_value > 0.05 && normality.p_value <= 1.0);
}

#[test]
fn test_histogram_auto_bins() {
    let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let hist = histogram(&values, None);

    assert_eq!(hist.counts, vec![2, 2, 2, 2, 2]);
    assert_eq!(hist.edges.len(), 6);
    assert_abs_diff_eq!(hist.edges[0], 0.0);
    assert_abs_diff_eq!(hist.edges[5], 9.0, epsilon = 1e-12);
}

#[test]
fn test_histogram_fixed_and_degenerate() {
    let hist = histogram(&[1.0, 2.0, 3.0, 4.0], Some(2));
    assert_eq!(hist.counts, vec![2, 2]);

    let flat = histogram(&[3.0, 3.0, 3.0], None);
    assert_eq!(flat.counts, vec![3]);
    assert_eq!(flat.edges, vec![2.5, 3.5]);
}

#[test]
fn test_histogram_heavy_tail_is_bounded() {
    let mut values: Vec<f64> = (0..200).map(|i| -1.0 + 2.0 * i as f64 / 199.0).collect();
    values.push(1e13);

    let hist = histogram(&values, None);

    // Sturges for n = 201
    assert_eq!(hist.counts.len(), 9);
    assert_eq!(hist.edges.len(), 10);
    assert_eq!(hist.counts[0], 200);
    assert_eq!(hist.counts[8], 1);
    assert_eq!(hist.counts.iter().sum::<usize>(), 201);
}

#[test]
fn test_histogram_requested_bins_are_capped() {
    let hist = histogram(&[0.0, 1.0], Some(usize::MAX));
    assert_eq!(hist.counts.len(), MAX_HISTOGRAM_BINS);
}

#[test]
fn test_cooks_threshold() {
    let cooks = cooks_distance(&[0.1, 0.9, 0.2, 0.05], None);
    assert_abs_diff_eq!(cooks.threshold, 1.0);
    assert!(cooks.influential.is_empty());

    let cooks = cooks_distance(&[0.1, 0.9, 0.2, 0.05], Some(0.15));
    assert_eq!(cooks.influential, vec![1, 2]);
}

// ==================== Full Report ====================

#[test]
fn test_diagnose_least_squares() {
    let df = regression_data();
    let independents = ["x1", "x2", "region"];
    let design = build(&df, "y", &independents, ModelKind::MultipleLinear).unwrap();
    let model = fit(&design).unwrap();

    let report = diagnose(
        &df,
        &design,
        model.as_ref(),
        &independents,
        &DiagnosticsConfig::default(),
    )
    .unwrap();

    assert_eq!(report.vif.len(), design.ncols());
    assert!(report.vif[1..].iter().all(|e| e.vif().unwrap() >= 1.0));
    assert!(matches!(report.correlation, Correlation::Matrix { .. }));

    let Residuals::Available(residuals) = report.residuals else {
        panic!("least-squares fits have residuals");
    };
    let n = design.nobs();
    assert_eq!(residuals.residuals.len(), n);
    assert_eq!(residuals.fitted.len(), n);
    assert_eq!(residuals.lowess.x.len(), n);
    assert!(residuals.lowess.x.windows(2).all(|w| w[0] <= w[1]));
    assert!(residuals.qq.sample.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(residuals.histogram.counts.iter().sum::<usize>(), n);
    assert_abs_diff_eq!(residuals.cooks.threshold, 4.0 / n as f64);
    assert_eq!(residuals.cooks.values.len(), n);
    assert!(residuals.durbin_watson >= 0.0 && residuals.durbin_watson <= 4.0);
    assert_abs_diff_eq!(residuals.summary.mean, 0.0, epsilon = 1e-9);
}

#[test]
fn test_diagnose_with_extreme_outlier() {
    let mut x: Vec<f64> = (0..30).map(|i| i as f64).collect();
    let mut y: Vec<f64> = x
        .iter()
        .map(|v| 2.0 + 0.5 * v + 0.01 * (3.0 * v).sin())
        .collect();
    x.push(30.0);
    y.push(1e13);
    let df = DataFrame::new()
        .with_column("x", Series::float(x))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap();
    let design = build(&df, "y", &["x"], ModelKind::MultipleLinear).unwrap();
    let model = fit(&design).unwrap();

    let report = diagnose(
        &df,
        &design,
        model.as_ref(),
        &["x"],
        &DiagnosticsConfig::default(),
    )
    .unwrap();

    let Residuals::Available(residuals) = report.residuals else {
        panic!("least-squares fits have residuals");
    };
    assert!(residuals.histogram.counts.len() <= MAX_HISTOGRAM_BINS);
    assert_eq!(residuals.histogram.counts.iter().sum::<usize>(), 31);
}

#[test]
fn test_diagnose_logistic_has_no_residuals() {
    let df = regression_data();
    let design = build(&df, "label", &["x2"], ModelKind::Logistic).unwrap();
    let model = fit(&design).unwrap();

    let report = diagnose(
        &df,
        &design,
        model.as_ref(),
        &["x2"],
        &DiagnosticsConfig::default(),
    )
    .unwrap();

    assert_eq!(report.vif.len(), 2);
    match report.residuals {
        Residuals::Unavailable { notice } => assert!(notice.contains("logistic")),
        Residuals::Available(_) => panic!("logistic fits have no residuals"),
    }
}

#[test]
fn test_diagnostics_config_validation() {
    assert!(DiagnosticsConfig::default().validate().is_ok());

    let config = DiagnosticsConfig {
        lowess_frac: 0.0,
        ..DiagnosticsConfig::default()
    };
    assert!(config.validate().is_err());

    let config = DiagnosticsConfig {
        histogram_bins: Some(0),
        ..DiagnosticsConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_diagnostics_config_rejects_excessive_bins() {
    let config = DiagnosticsConfig {
        histogram_bins: Some(MAX_HISTOGRAM_BINS + 1),
        ..DiagnosticsConfig::default()
    };
    assert!(config.validate().is_err());

    let config = DiagnosticsConfig {
        histogram_bins: Some(MAX_HISTOGRAM_BINS),
        ..DiagnosticsConfig::default()
    };
    assert!(config.validate().is_ok());
}
