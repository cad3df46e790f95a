//! Per-user dashboard session
//!
//! A [`Session`] holds the uploaded table, the current variable selection and
//! whatever was derived from them. Uploading a new table clears everything;
//! changing the selection drops the design, the fitted model and the
//! prediction log so nothing stale can be reported.

use serde::{Deserialize, Serialize};

use rd_core::data::DataFrame;
use rd_core::design::{self, DesignError, DesignMatrix, ModelKind};
use rd_core::io::load_table;

use crate::base::{FittedModel, ModelError, Result};
use crate::diagnostics::{self, DiagnosticsConfig, DiagnosticsReport};
use crate::fit::{fit_with, FitConfig};
use crate::metrics::FitMetrics;
use crate::prediction::{self, FeatureVector, Forecast, PredictionLog, PredictionResult};


/// Variables and model kind chosen by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub dependent: String,
    pub independents: Vec<String>,
    pub kind: ModelKind,
}

impl Selection {
    pub fn new<S: Into<String>>(
        dependent: impl Into<String>,
        independents: impl IntoIterator<Item = S>,
        kind: ModelKind,
    ) -> Self {
        Self {
            dependent: dependent.into(),
            independents: independents.into_iter().map(Into::into).collect(),
            kind,
        }
    }
}

/// Session state for one user
#[derive(Debug, Default)]
pub struct Session {
    fit_config: FitConfig,
    diagnostics_config: DiagnosticsConfig,
    table: Option<DataFrame>,
    selection: Option<Selection>,
    design: Option<DesignMatrix>,
    model: Option<Box<dyn FittedModel>>,
    log: Option<PredictionLog>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with custom fitting and diagnostics settings
    pub fn with_config(fit_config: FitConfig, diagnostics_config: DiagnosticsConfig) -> Result<Self> {
        fit_config.validate()?;
        diagnostics_config.validate()?;

        Ok(Self {
            fit_config,
            diagnostics_config,
            ..Self::default()
        })
    }

    pub fn table(&self) -> Option<&DataFrame> {
        self.table.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn design(&self) -> Option<&DesignMatrix> {
        self.design.as_ref()
    }

    pub fn model(&self) -> Option<&dyn FittedModel> {
        self.model.as_deref()
    }

    // ==================== State Changes ====================

    /// Load a CSV upload, replacing any previous table
    pub fn upload(&mut self, bytes: &[u8]) -> Result<&DataFrame> {
        let table = load_table(bytes)?;
        if table.numeric_column_names().is_empty() {
            return Err(DesignError::NoNumericColumns.into());
        }

        tracing::info!(
            rows = table.nrows(),
            columns = table.ncols(),
            "dataset uploaded"
        );

        self.selection = None;
        self.clear_fit();
        Ok(self.table.insert(table))
    }

    /// Choose the variables and model kind
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        let table = self.table.as_ref().ok_or_else(|| DesignError::InvalidSelection {
            message: "upload a dataset before selecting variables".to_string(),
        })?;

        selection.kind.validate()?;
        let target = table.column(&selection.dependent)?;
        if selection.kind.is_least_squares() && !target.column_type().is_number() {
            return Err(DesignError::NonNumericTarget {
                column: selection.dependent.clone(),
                dtype: target.dtype(),
            }
            .into());
        }

        if self.selection.as_ref() != Some(&selection) {
            if self.model.is_some() {
                tracing::warn!("selection changed, discarding fitted model");
            }
            self.clear_fit();
            self.selection = Some(selection);
        }

        Ok(())
    }

    /// Build the design for the current selection and fit it
    pub fn fit(&mut self) -> Result<&dyn FittedModel> {
        let (Some(table), Some(selection)) = (&self.table, &self.selection) else {
            return Err(DesignError::InvalidSelection {
                message: "select a dependent variable and predictors before fitting".to_string(),
            }
            .into());
        };

        let design = design::build(
            table,
            &selection.dependent,
            &selection.independents,
            selection.kind,
        )?;
        let model = fit_with(&design, &self.fit_config)?;

        self.log = Some(PredictionLog::new(&design));
        self.design = Some(design);
        Ok(&**self.model.insert(model))
    }

    fn clear_fit(&mut self) {
        self.design = None;
        self.model = None;
        self.log = None;
    }

    // ==================== Fitted-Model Operations ====================

    fn fitted(&self) -> Result<(&DesignMatrix, &dyn FittedModel)> {
        match (&self.design, &self.model) {
            (Some(design), Some(model)) => Ok((design, model.as_ref())),
            _ => Err(ModelError::NotFitted),
        }
    }

    /// Diagnostics for the fitted model
    pub fn diagnose(&self) -> Result<DiagnosticsReport> {
        let (design, model) = self.fitted()?;
        let (Some(table), Some(selection)) = (&self.table, &self.selection) else {
            return Err(ModelError::NotFitted);
        };

        diagnostics::diagnose(
            table,
            design,
            model,
            &selection.independents,
            &self.diagnostics_config,
        )
    }

    /// In-sample fit metrics
    pub fn metrics(&self) -> Result<FitMetrics> {
        let (design, model) = self.fitted()?;
        FitMetrics::compute(design, model)
    }

    /// Input values the prediction form starts from
    pub fn default_features(&self) -> Result<FeatureVector> {
        let (design, _) = self.fitted()?;
        Ok(FeatureVector::from_means(design))
    }

    /// Predict one observation and append it to the log
    pub fn predict(&mut self, features: &FeatureVector) -> Result<PredictionResult> {
        let (Some(design), Some(model)) = (&self.design, &self.model) else {
            return Err(ModelError::NotFitted);
        };

        let result = prediction::predict(
            design,
            model.as_ref(),
            features,
            self.fit_config.confidence_level,
        )?;
        self.log
            .get_or_insert_with(|| PredictionLog::new(design))
            .record(features, &result)?;

        Ok(result)
    }

    /// Forecast the month after the last observed one
    pub fn forecast(&self) -> Result<Forecast> {
        let (design, model) = self.fitted()?;
        prediction::forecast_next(design, model, self.fit_config.confidence_level)
    }

    /// Plain-text model summary
    pub fn summary_text(&self) -> Result<String> {
        let (_, model) = self.fitted()?;
        Ok(model.summary().to_string())
    }

    /// Prediction log as CSV
    pub fn prediction_log_csv(&self) -> Result<String> {
        self.fitted()?;
        match &self.log {
            Some(log) => log.to_csv(),
            None => Err(ModelError::NotFitted),
        }
    }
}
