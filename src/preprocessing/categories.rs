//! Sorted category index shared by the label and one-hot encoders

use crate::error::{EncodeError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// How the values of a fitted column are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Signed or unsigned integer column, ordered as integers
    Integer,
    /// Float column, ordered numerically with NaN last
    Float,
    /// Anything else, ordered lexicographically
    Text,
}

impl ValueKind {
    /// Pick the ordering for a polars dtype
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_integer() {
            ValueKind::Integer
        } else if dtype.is_float() {
            ValueKind::Float
        } else {
            ValueKind::Text
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            // i128 holds every i64 and u64 exactly
            ValueKind::Integer => match (a.parse::<i128>(), b.parse::<i128>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.cmp(b),
            },
            ValueKind::Float => match (a.parse::<f64>(), b.parse::<f64>()) {
                (Ok(x), Ok(y)) => x.total_cmp(&y),
                _ => a.cmp(b),
            },
            ValueKind::Text => a.cmp(b),
        }
    }
}

/// Distinct values of a column in sorted order, with a reverse lookup.
///
/// The position of a value in [`CategoryIndex::classes`] is its encoded index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryIndex {
    kind: ValueKind,
    classes: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl CategoryIndex {
    /// Build an index from raw values; duplicates are collapsed
    pub fn from_values<'a, I>(values: I, kind: ValueKind) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let mut classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        classes.sort_by(|a, b| kind.compare(a, b));

        let lookup = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();

        Self {
            kind,
            classes,
            lookup,
        }
    }

    /// Fit an index on a column. Nulls and empty columns are rejected.
    pub fn fit(series: &Series, column: &str) -> Result<Self> {
        let kind = ValueKind::of(series.dtype());
        let ca = string_values(series)?;

        let mut values = Vec::with_capacity(ca.len());
        for (row, value) in ca.into_iter().enumerate() {
            match value {
                Some(v) => values.push(v),
                None => {
                    return Err(EncodeError::NullCategory {
                        column: column.to_string(),
                        row,
                    })
                }
            }
        }

        if values.is_empty() {
            return Err(EncodeError::EmptyColumn(column.to_string()));
        }

        Ok(Self::from_values(values, kind))
    }

    /// Encoded index of a value, if it was seen during fit
    pub fn get(&self, value: &str) -> Option<usize> {
        self.lookup.get(value).copied()
    }

    /// Value for an encoded index
    pub fn class(&self, idx: usize) -> Option<&str> {
        self.classes.get(idx).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Render any column as strings so categories compare by value.
///
/// `-0.0` is rendered as `0.0` so both zeros fall in one category.
pub(crate) fn string_values(series: &Series) -> Result<StringChunked> {
    let normalized = match series.dtype() {
        DataType::Float64 => series
            .f64()?
            .apply_values(|v| if v == 0.0 { 0.0 } else { v })
            .into_series(),
        DataType::Float32 => series
            .f32()?
            .apply_values(|v| if v == 0.0 { 0.0 } else { v })
            .into_series(),
        _ => series.clone(),
    };
    let cast = normalized.cast(&DataType::String)?;
    Ok(cast.str()?.clone())
}

/// Look up a column by name as a materialized series
pub(crate) fn column_series<'a>(df: &'a DataFrame, column: &str) -> Result<&'a Series> {
    df.column(column)
        .map(|c| c.as_materialized_series())
        .map_err(|_| EncodeError::FeatureNotFound(column.to_string()))
}
