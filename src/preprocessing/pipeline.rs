//! Label then one-hot encoding pipeline

use super::{EncodingConfig, LabelEncoder, OneHotEncoder};
use crate::error::{EncodeError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Fitted encoders of a pipeline run, as written by `--save-state`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub column: String,
    pub label: LabelEncoder,
    pub onehot: OneHotEncoder,
}

impl PipelineState {
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Encodes a categorical column to `{column}_label`, then expands that label
/// column to `{column}_label_onehot_{i}`.
///
/// `handle_unknown` applies to both stages: with `Ignore`, an unseen value gets
/// a null label and an all-zero one-hot row.
#[derive(Debug, Clone)]
pub struct CategoricalPipeline {
    config: EncodingConfig,
    label: LabelEncoder,
    onehot: OneHotEncoder,
    /// Seconds spent in the last run
    run_time: Option<f64>,
    rows_processed: usize,
}

impl CategoricalPipeline {
    pub fn new(config: EncodingConfig) -> Self {
        let onehot = OneHotEncoder::new(config.handle_unknown);
        Self {
            label: LabelEncoder::new().with_handle_unknown(config.handle_unknown),
            config,
            onehot,
            run_time: None,
            rows_processed: 0,
        }
    }

    /// Rebuild a fitted pipeline from saved state
    pub fn from_state(config: EncodingConfig, state: PipelineState) -> Result<Self> {
        if state.column != config.column {
            return Err(EncodeError::ConfigError(format!(
                "saved state encodes '{}', config asks for '{}'",
                state.column, config.column
            )));
        }
        Ok(Self {
            config,
            label: state.label,
            onehot: state.onehot,
            run_time: None,
            rows_processed: 0,
        })
    }

    /// Fit both encoders on `df` and return it with the new columns appended
    pub fn run(&mut self, df: &DataFrame) -> Result<DataFrame> {
        let start = Instant::now();
        let column = self.config.column.clone();

        let labeled = self.label.fit_transform(df, &column)?;
        let label_column = self.label.output_column()?;
        let encoded = self.onehot.fit_transform(&labeled, &label_column)?;

        self.finish(start, &encoded);
        Ok(encoded)
    }

    /// Apply already fitted encoders to new data
    pub fn transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        let start = Instant::now();
        let labeled = self.label.transform(df)?;
        let encoded = self.onehot.transform(&labeled)?;

        self.finish(start, &encoded);
        Ok(encoded)
    }

    fn finish(&mut self, start: Instant, encoded: &DataFrame) {
        let elapsed = start.elapsed().as_secs_f64();
        self.run_time = Some(elapsed);
        self.rows_processed += encoded.height();

        info!(
            column = %self.config.column,
            rows = encoded.height(),
            width = encoded.width(),
            elapsed_ms = elapsed * 1000.0,
            "Encoded categorical column"
        );
    }

    pub fn label_encoder(&self) -> &LabelEncoder {
        &self.label
    }

    pub fn onehot_encoder(&self) -> &OneHotEncoder {
        &self.onehot
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.label.is_fitted() && self.onehot.is_fitted()
    }

    /// Snapshot of the fitted encoders
    pub fn state(&self) -> Result<PipelineState> {
        if !self.is_fitted() {
            return Err(EncodeError::ModelNotFitted);
        }
        Ok(PipelineState {
            column: self.config.column.clone(),
            label: self.label.clone(),
            onehot: self.onehot.clone(),
        })
    }

    pub fn get_performance_metrics(&self) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();
        metrics.insert("rows_processed".to_string(), self.rows_processed as f64);
        metrics.insert("n_classes".to_string(), self.label.n_classes() as f64);
        if let Some(t) = self.run_time {
            metrics.insert("last_run_secs".to_string(), t);
        }
        metrics
    }
}
