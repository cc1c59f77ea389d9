//! Label encoding: categories to dense integers

use super::categories::{column_series, string_values, CategoryIndex};
use super::HandleUnknown;
use crate::error::{EncodeError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Suffix of the column appended by [`LabelEncoder::transform`]
pub const LABEL_SUFFIX: &str = "_label";

/// Maps each category of one column to an integer in `0..n_classes`.
///
/// Classes are the sorted distinct values seen during [`fit`](Self::fit), so the
/// label of a value is its rank among them. Under [`HandleUnknown::Ignore`] a
/// value unseen during fit gets a null label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    #[serde(default)]
    handle_unknown: HandleUnknown,
    column: Option<String>,
    index: Option<CategoryIndex>,
}

impl LabelEncoder {
    /// Create an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for values unseen during fit
    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }

    /// Learn the classes of `column`
    pub fn fit(&mut self, df: &DataFrame, column: &str) -> Result<&mut Self> {
        let series = column_series(df, column)?;
        let index = CategoryIndex::fit(series, column)?;

        info!(column, n_classes = index.len(), "Fitted label encoder");
        debug!(column, classes = ?index.classes(), "Label classes");

        self.column = Some(column.to_string());
        self.index = Some(index);
        Ok(self)
    }

    /// Append `{column}_label` holding the integer label of every row
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let (column, index) = self.fitted()?;
        let output = self.output_column()?;
        if df.column(&output).is_ok() {
            return Err(EncodeError::DuplicateColumn(output));
        }

        let ca = string_values(column_series(df, column)?)?;
        let labels = ca
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.ok_or_else(|| EncodeError::NullCategory {
                    column: column.clone(),
                    row,
                })?;
                match (index.get(value), self.handle_unknown) {
                    (Some(idx), _) => Ok(Some(idx as i64)),
                    (None, HandleUnknown::Ignore) => Ok(None),
                    (None, HandleUnknown::Error) => Err(EncodeError::UnknownCategory {
                        column: column.clone(),
                        value: value.to_string(),
                    }),
                }
            })
            .collect::<Result<Vec<Option<i64>>>>()?;

        let mut result = df.clone();
        result.with_column(Series::new(output.as_str().into(), labels))?;
        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, column: &str) -> Result<DataFrame> {
        self.fit(df, column)?;
        self.transform(df)
    }

    /// Map integer labels back to their classes
    pub fn inverse_transform(&self, labels: &Series) -> Result<Series> {
        let (_, index) = self.fitted()?;
        let ca = labels.cast(&DataType::Int64)?;
        let ca = ca.i64()?;

        let values = ca
            .into_iter()
            .map(|label| match label {
                None => Ok(None),
                Some(l) => usize::try_from(l)
                    .ok()
                    .and_then(|idx| index.class(idx))
                    .map(Some)
                    .ok_or_else(|| {
                        EncodeError::InvalidInput(format!(
                            "label {} is outside 0..{}",
                            l,
                            index.len()
                        ))
                    }),
            })
            .collect::<Result<Vec<Option<&str>>>>()?;

        Ok(Series::new(labels.name().clone(), values))
    }

    /// Sorted classes learnt during fit
    pub fn classes(&self) -> Option<&[String]> {
        self.index.as_ref().map(CategoryIndex::classes)
    }

    pub fn n_classes(&self) -> usize {
        self.index.as_ref().map_or(0, CategoryIndex::len)
    }

    /// Name of the column this encoder appends
    pub fn output_column(&self) -> Result<String> {
        let (column, _) = self.fitted()?;
        Ok(format!("{}{}", column, LABEL_SUFFIX))
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

    fn devices() -> DataFrame {
        df!(
            "id" => &[1i64, 2, 3, 4, 5],
            "device" => &["pc", "mobile", "tablet", "mobile", "pc"],
        )
        .unwrap()
    }

    #[test]
    fn test_label_encoding() {
        let mut encoder = LabelEncoder::new();
        let result = encoder.fit_transform(&devices(), "device").unwrap();

        let labels: Vec<Option<i64>> = result
            .column("device_label")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(labels, vec![Some(1), Some(0), Some(2), Some(0), Some(1)]);
        assert_eq!(result.width(), 3);
        assert_eq!(encoder.n_classes(), 3);
    }

    #[test]
    fn test_transform_before_fit() {
        let encoder = LabelEncoder::new();
        let err = encoder.transform(&devices()).unwrap_err();
        assert!(matches!(err, EncodeError::ModelNotFitted));
    }

    #[test]
    fn test_unknown_category() {
        let mut encoder = LabelEncoder::new();
        encoder.fit(&devices(), "device").unwrap();

        let other = df!("device" => &["pc", "watch"]).unwrap();
        let err = encoder.transform(&other).unwrap_err();
        match err {
            EncodeError::UnknownCategory { column, value } => {
                assert_eq!(column, "device");
                assert_eq!(value, "watch");
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_unknown_category_ignored() {
        let mut encoder = LabelEncoder::new().with_handle_unknown(HandleUnknown::Ignore);
        encoder.fit(&devices(), "device").unwrap();

        let other = df!("device" => &["pc", "watch"]).unwrap();
        let result = encoder.transform(&other).unwrap();
        let labels: Vec<Option<i64>> = result
            .column("device_label")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(labels, vec![Some(1), None]);
    }

    #[test]
    fn test_missing_column() {
        let mut encoder = LabelEncoder::new();
        let err = encoder.fit(&devices(), "browser").unwrap_err();
        assert!(matches!(err, EncodeError::FeatureNotFound(_)));
    }

    #[test]
    fn test_inverse_transform() {
        let mut encoder = LabelEncoder::new();
        let df = devices();
        let result = encoder.fit_transform(&df, "device").unwrap();

        let labels = result.column("device_label").unwrap().as_materialized_series();
        let restored = encoder.inverse_transform(labels).unwrap();
        let restored: Vec<Option<&str>> = restored.str().unwrap().into_iter().collect();
        assert_eq!(
            restored,
            vec![Some("pc"), Some("mobile"), Some("tablet"), Some("mobile"), Some("pc")]
        );
    }

    #[test]
    fn test_inverse_transform_out_of_range() {
        let mut encoder = LabelEncoder::new();
        encoder.fit(&devices(), "device").unwrap();

        let labels = Series::new("device_label".into(), &[0i64, 7]);
        let err = encoder.inverse_transform(&labels).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidInput(_)));
    }
}
