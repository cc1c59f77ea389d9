//! Categorical preprocessing
//!
//! - Label encoding: category values to dense integers `0..n-1`
//! - One-hot encoding: integer labels to indicator columns or sparse vectors
//! - A pipeline composing the two on a single column

mod categories;
mod config;
mod label;
mod onehot;
mod pipeline;

pub use categories::{CategoryIndex, ValueKind};
pub use config::EncodingConfig;
pub use label::{LabelEncoder, LABEL_SUFFIX};
pub use onehot::{HandleUnknown, OneHotEncoder, SparseOneHot, SparseVector, ONEHOT_INFIX};
pub use pipeline::{CategoricalPipeline, PipelineState};

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary of one column, as shown by `catencode info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub count: usize,
    pub null_count: usize,
    pub unique_count: usize,
}

impl ColumnSummary {
    pub fn from_column(column: &Column) -> Result<Self> {
        Ok(Self {
            name: column.name().to_string(),
            dtype: column.dtype().to_string(),
            count: column.len(),
            null_count: column.null_count(),
            unique_count: column.n_unique()?,
        })
    }
}

/// Summarize every column of a frame
pub fn summarize(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    df.get_columns().iter().map(ColumnSummary::from_column).collect()
}
