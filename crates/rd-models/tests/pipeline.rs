//! End-to-end run from an uploaded CSV to a forecast

use approx::assert_abs_diff_eq;

use rd_core::design::ModelKind;
use rd_models::{FeatureVector, Forecast, Selection, Session};

const MONTHLY_CSV: &str = "\
Month,Price,Sales
Jan 2023,10.0,200
Feb 2023,11.0,195
Mar 2023,10.5,205
Apr 2023,12.0,190
May 2023,11.5,198
Jun 2023,13.0,185
Jul 2023,12.5,192
Aug 2023,14.0,180
Sep 2023,13.5,186
Oct 2023,15.0,175
Nov 2023,14.5,181
Dec 2023,16.0,170
";

#[test]
fn csv_to_forecast() {
    let mut session = Session::new();
    session.upload(MONTHLY_CSV.as_bytes()).unwrap();
    session
        .select(Selection::new(
            "Sales",
            ["Price", "Month"],
            ModelKind::MultipleLinear,
        ))
        .unwrap();
    session.fit().unwrap();

    let design = session.design().unwrap();
    assert_eq!(design.columns, ["const", "Price", "Month"]);
    let months: Vec<f64> = design.input_column("Month").unwrap().to_vec();
    assert_eq!(months, (1..=12).map(f64::from).collect::<Vec<_>>());

    let report = session.diagnose().unwrap();
    assert_eq!(report.vif.len(), 3);

    let prediction = session
        .predict(&FeatureVector::new().with("Price", 15.5).with("Month", 12.0))
        .unwrap();
    assert!(prediction.mean.is_finite());

    match session.forecast().unwrap() {
        Forecast::Predicted {
            month,
            features,
            prediction,
        } => {
            assert_abs_diff_eq!(month, 13.0);
            assert_abs_diff_eq!(features.get("Price").unwrap(), 13.125, epsilon = 1e-12);
            assert!(prediction.mean.is_finite());
        }
        Forecast::NoMonthColumn => panic!("Month was selected"),
    }

    let log = session.prediction_log_csv().unwrap();
    assert_eq!(log.lines().count(), 2);
    assert!(session.summary_text().unwrap().contains("Sales"));
}
