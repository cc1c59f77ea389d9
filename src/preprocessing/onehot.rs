//! One-hot encoding of a labeled column into sparse indicator vectors

use super::categories::{column_series, string_values, CategoryIndex};
use crate::error::{EncodeError, Result};
use ndarray::Array2;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Infix between the source column and the category position in output names
pub const ONEHOT_INFIX: &str = "_onehot_";

/// What to do with a value that was not seen during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    /// Fail the transform
    #[default]
    Error,
    /// Encode the row as all zeros; null inputs, such as the label of an
    /// ignored value, are treated the same way
    Ignore,
}

impl FromStr for HandleUnknown {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(HandleUnknown::Error),
            "ignore" => Ok(HandleUnknown::Ignore),
            other => Err(EncodeError::ConfigError(format!(
                "handle_unknown must be 'error' or 'ignore', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for HandleUnknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleUnknown::Error => write!(f, "error"),
            HandleUnknown::Ignore => write!(f, "ignore"),
        }
    }
}

/// One row of a one-hot matrix in coordinate form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseVector {
    pub size: usize,
    pub indices: Vec<usize>,
    pub values: Vec<i32>,
}

impl SparseVector {
    pub fn to_dense(&self) -> Vec<i32> {
        let mut dense = vec![0; self.size];
        for (&idx, &value) in self.indices.iter().zip(&self.values) {
            dense[idx] = value;
        }
        dense
    }
}

/// One-hot matrix storing the hot position of every row.
///
/// A row holds at most one non-zero; `None` marks an ignored unknown value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseOneHot {
    n_categories: usize,
    hot: Vec<Option<usize>>,
}

impl SparseOneHot {
    pub fn new(n_categories: usize, hot: Vec<Option<usize>>) -> Result<Self> {
        if let Some(bad) = hot.iter().flatten().find(|&&idx| idx >= n_categories) {
            return Err(EncodeError::InvalidInput(format!(
                "hot index {} is outside 0..{}",
                bad, n_categories
            )));
        }
        Ok(Self { n_categories, hot })
    }

    pub fn n_rows(&self) -> usize {
        self.hot.len()
    }

    pub fn n_categories(&self) -> usize {
        self.n_categories
    }

    /// Number of stored ones
    pub fn nnz(&self) -> usize {
        self.hot.iter().filter(|h| h.is_some()).count()
    }

    /// Hot position of each row
    pub fn hot_indices(&self) -> &[Option<usize>] {
        &self.hot
    }

    pub fn row(&self, row: usize) -> Option<SparseVector> {
        self.hot.get(row).map(|hot| {
            let indices: Vec<usize> = hot.iter().copied().collect();
            let values = vec![1; indices.len()];
            SparseVector {
                size: self.n_categories,
                indices,
                values,
            }
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseVector> + '_ {
        (0..self.n_rows()).filter_map(move |row| self.row(row))
    }

    /// Dense `n_rows x n_categories` matrix
    pub fn to_dense(&self) -> Array2<i32> {
        let mut dense = Array2::zeros((self.n_rows(), self.n_categories));
        for (row, hot) in self.hot.iter().enumerate() {
            if let Some(col) = hot {
                dense[[row, *col]] = 1;
            }
        }
        dense
    }

    /// One Int32 indicator column per category, named `{source}_onehot_{i}`
    pub fn to_columns(&self, source: &str) -> Vec<Column> {
        (0..self.n_categories)
            .into_par_iter()
            .map(|category| {
                let values: Vec<i32> = self
                    .hot
                    .iter()
                    .map(|hot| i32::from(*hot == Some(category)))
                    .collect();
                Column::new(feature_name(source, category).into(), values)
            })
            .collect()
    }
}

fn feature_name(source: &str, category: usize) -> String {
    format!("{}{}{}", source, ONEHOT_INFIX, category)
}

/// Expands one column into indicator columns, one per fitted category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
    column: Option<String>,
    index: Option<CategoryIndex>,
}

impl OneHotEncoder {
    /// Create an unfitted encoder
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self {
            handle_unknown,
            column: None,
            index: None,
        }
    }

    /// Learn the categories of `column`
    pub fn fit(&mut self, df: &DataFrame, column: &str) -> Result<&mut Self> {
        let series = column_series(df, column)?;
        let index = CategoryIndex::fit(series, column)?;

        info!(column, n_categories = index.len(), "Fitted one-hot encoder");
        debug!(column, categories = ?index.classes(), "One-hot categories");

        self.column = Some(column.to_string());
        self.index = Some(index);
        Ok(self)
    }

    /// Encode the fitted column of `df` without materializing dense columns
    pub fn transform_sparse(&self, df: &DataFrame) -> Result<SparseOneHot> {
        let (column, index) = self.fitted()?;
        let ca = string_values(column_series(df, column)?)?;
        let values: Vec<Option<&str>> = ca.into_iter().collect();

        let hot = values
            .par_iter()
            .enumerate()
            .map(|(row, &value)| {
                let value = match (value, self.handle_unknown) {
                    (Some(v), _) => v,
                    (None, HandleUnknown::Ignore) => return Ok(None),
                    (None, HandleUnknown::Error) => {
                        return Err(EncodeError::NullCategory {
                            column: column.clone(),
                            row,
                        })
                    }
                };
                match (index.get(value), self.handle_unknown) {
                    (Some(idx), _) => Ok(Some(idx)),
                    (None, HandleUnknown::Ignore) => Ok(None),
                    (None, HandleUnknown::Error) => Err(EncodeError::UnknownCategory {
                        column: column.clone(),
                        value: value.to_string(),
                    }),
                }
            })
            .collect::<Result<Vec<Option<usize>>>>()?;

        let encoded = SparseOneHot::new(index.len(), hot)?;
        let ignored = encoded.n_rows() - encoded.nnz();
        if ignored > 0 {
            debug!(column, ignored, "Rows with unknown categories encoded as zeros");
        }
        Ok(encoded)
    }

    /// Append one indicator column per category after the existing columns
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let (column, _) = self.fitted()?;
        for name in self.feature_names()? {
            if df.column(&name).is_ok() {
                return Err(EncodeError::DuplicateColumn(name));
            }
        }

        let encoded = self.transform_sparse(df)?;
        let columns = encoded.to_columns(column);
        Ok(df.hstack(&columns)?)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, column: &str) -> Result<DataFrame> {
        self.fit(df, column)?;
        self.transform(df)
    }

    /// Names of the columns [`transform`](Self::transform) appends
    pub fn feature_names(&self) -> Result<Vec<String>> {
        let (column, index) = self.fitted()?;
        Ok((0..index.len()).map(|i| feature_name(column, i)).collect())
    }

    pub fn categories(&self) -> Option<&[String]> {
        self.index.as_ref().map(CategoryIndex::classes)
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }

    pub fn is_fitted(&self) -> bool {
        self.index.is_some()
    }

    fn fitted(&self) -> Result<(&String, &CategoryIndex)> {
        match (&self.column, &self.index) {
            (Some(column), Some(index)) => Ok((column, index)),
            _ => Err(EncodeError::ModelNotFitted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> DataFrame {
        df!(
            "device" => &["pc", "mobile", "tablet", "mobile"],
            "device_label" => &[1i64, 0, 2, 0],
        )
        .unwrap()
    }

    fn column_values(df: &DataFrame, name: &str) -> Vec<i32> {
        df.column(name)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn test_onehot_encoding() {
        let mut encoder = OneHotEncoder::default();
        let result = encoder.fit_transform(&labels(), "device_label").unwrap();

        // Original columns kept, one column per category appended
        assert_eq!(result.width(), 5);
        assert_eq!(result.height(), 4);
        assert_eq!(column_values(&result, "device_label_onehot_0"), vec![0, 1, 0, 1]);
        assert_eq!(column_values(&result, "device_label_onehot_1"), vec![1, 0, 0, 0]);
        assert_eq!(column_values(&result, "device_label_onehot_2"), vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_feature_names() {
        let mut encoder = OneHotEncoder::default();
        encoder.fit(&labels(), "device_label").unwrap();
        assert_eq!(
            encoder.feature_names().unwrap(),
            vec!["device_label_onehot_0", "device_label_onehot_1", "device_label_onehot_2"]
        );
    }

    #[test]
    fn test_unknown_errors_by_default() {
        let mut encoder = OneHotEncoder::default();
        encoder.fit(&labels(), "device_label").unwrap();

        let other = df!("device_label" => &[0i64, 5]).unwrap();
        let err = encoder.transform(&other).unwrap_err();
        assert!(matches!(err, EncodeError::UnknownCategory { ref value, .. } if value == "5"));
    }

    #[test]
    fn test_unknown_ignored() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        encoder.fit(&labels(), "device_label").unwrap();

        let other = df!("device_label" => &[0i64, 5]).unwrap();
        let sparse = encoder.transform_sparse(&other).unwrap();
        assert_eq!(sparse.hot_indices(), &[Some(0), None]);
        assert_eq!(sparse.nnz(), 1);
        assert_eq!(sparse.row(1).unwrap().to_dense(), vec![0, 0, 0]);
    }

    #[test]
    fn test_null_ignored() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        encoder.fit(&labels(), "device_label").unwrap();

        let other = df!("device_label" => &[Some(2i64), None]).unwrap();
        let sparse = encoder.transform_sparse(&other).unwrap();
        assert_eq!(sparse.hot_indices(), &[Some(2), None]);
    }

    #[test]
    fn test_null_rejected_by_default() {
        let mut encoder = OneHotEncoder::default();
        encoder.fit(&labels(), "device_label").unwrap();

        let other = df!("device_label" => &[Some(2i64), None]).unwrap();
        let err = encoder.transform_sparse(&other).unwrap_err();
        assert!(matches!(err, EncodeError::NullCategory { row: 1, .. }));
    }

    #[test]
    fn test_sparse_to_dense() {
        let mut encoder = OneHotEncoder::default();
        encoder.fit(&labels(), "device_label").unwrap();

        let sparse = encoder.transform_sparse(&labels()).unwrap();
        let dense = sparse.to_dense();
        assert_eq!(dense.shape(), &[4, 3]);
        for row in dense.rows() {
            assert_eq!(row.sum(), 1);
        }
        assert_eq!(dense[[2, 2]], 1);

        let first = sparse.row(0).unwrap();
        assert_eq!(first.size, 3);
        assert_eq!(first.indices, vec![1]);
        assert_eq!(first.values, vec![1]);
    }

    #[test]
    fn test_duplicate_output_column() {
        let mut df = labels();
        df.with_column(Series::new("device_label_onehot_0".into(), &[0i32, 0, 0, 0]))
            .unwrap();

        let mut encoder = OneHotEncoder::default();
        let err = encoder.fit_transform(&df, "device_label").unwrap_err();
        assert!(matches!(err, EncodeError::DuplicateColumn(_)));
    }

    #[test]
    fn test_handle_unknown_parse() {
        assert_eq!("IGNORE".parse::<HandleUnknown>().unwrap(), HandleUnknown::Ignore);
        assert!("drop".parse::<HandleUnknown>().is_err());
    }
}
