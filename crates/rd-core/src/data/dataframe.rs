//! DataFrame implementation for tabular data
//!
//! A DataFrame is a 2-dimensional labeled data structure with columns of
//! potentially different types. Uploaded datasets live in a DataFrame and are
//! treated as read-only once loaded.

use super::*;

use indexmap::IndexMap;

/// Main DataFrame structure
#[derive(Clone, Debug, Default)]
pub struct DataFrame {
    pub(crate) columns: IndexMap<String, Series>,
    pub(crate) nrows: usize,
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self::default()
    }

    /// Create DataFrame from columns
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .try_fold(Self::new(), |df, (name, series)| df.with_column(name, series))
    }

    /// Get the shape of the DataFrame (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.columns.len())
    }

    /// Get the number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Get the number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get a reference to a column
    pub fn get_column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Get a reference to a column, failing if it does not exist
    pub fn column(&self, name: &str) -> Result<&Series> {
        self.columns
            .get(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Names of the columns that hold plain numbers (floats or integers)
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, s)| s.column_type().is_number())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Select specific columns
    pub fn select<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = Self::new();
        for name in names.into_iter() {
            let name = name.as_ref();
            selected = selected.with_column(name, self.column(name)?.clone())?;
        }

        // Keep the row count even when no column was selected
        selected.nrows = self.nrows;
        Ok(selected)
    }

    /// Filter rows with a boolean mask
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.nrows),
                actual: format!("mask length {}", mask.len()),
            });
        }

        self.columns.iter().try_fold(Self::new(), |df, (name, series)| {
            df.with_column(name.clone(), series.filter(mask)?)
        })
    }

    /// Add a new column
    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        if !self.columns.is_empty() && series.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", series.len()),
            });
        }

        if self.columns.is_empty() {
            self.nrows = series.len();
        }

        self.columns.insert(name, series);

        Ok(self)
    }

    /// Replace an existing column in place, keeping its position
    pub fn replace_column(&mut self, name: &str, series: Series) -> Result<()> {
        if series.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", series.len()),
            });
        }

        match self.columns.get_mut(name) {
            Some(existing) => {
                *existing = series;
                Ok(())
            }
            None => Err(DataError::ColumnNotFound(name.to_string())),
        }
    }

    /// Compute the Pearson correlation matrix of the numeric columns
    ///
    /// Each pair uses the rows where both columns are present, so missing
    /// values in one column do not discard data from the others. Pairs with
    /// fewer than two complete rows or zero variance yield `NaN`.
    pub fn corr(&self) -> Result<Matrix> {
        let columns: Vec<FloatArray> = self
            .numeric_column_names()
            .into_iter()
            .map(|name| self.column(name).and_then(Series::to_float))
            .collect::<Result<_>>()?;

        let k = columns.len();
        let mut corr = Matrix::zeros((k, k));

        for i in 0..k {
            for j in i..k {
                let r = pairwise_pearson(&columns[i], &columns[j]);
                corr[(i, j)] = r;
                corr[(j, i)] = r;
            }
        }

        Ok(corr)
    }
}

fn pairwise_pearson(a: &FloatArray, b: &FloatArray) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (da, db) = (x - mean_a, y - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a > 0.0 && var_b > 0.0 {
        (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
    } else {
        f64::NAN
    }
}

impl std::fmt::Display for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataFrame({} rows × {} cols)", self.nrows, self.ncols())
    }
}
