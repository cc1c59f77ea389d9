//! Encoding configuration

use super::HandleUnknown;
use crate::error::{EncodeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a label then one-hot encoding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Input table
    pub input: PathBuf,

    /// Categorical column to encode
    pub column: String,

    /// Policy for values unseen while fitting the one-hot encoder
    pub handle_unknown: HandleUnknown,

    /// Where to write the encoded table; printed only when unset
    pub output: Option<PathBuf>,

    /// Where to write the fitted encoders as JSON
    pub state_path: Option<PathBuf>,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("test.csv"),
            column: "device".to_string(),
            handle_unknown: HandleUnknown::Error,
            output: None,
            state_path: None,
        }
    }
}

impl EncodingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            EncodeError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    /// Reject configurations that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        if self.column.trim().is_empty() {
            return Err(EncodeError::ConfigError("column must not be empty".to_string()));
        }
        if self.input.as_os_str().is_empty() {
            return Err(EncodeError::ConfigError("input path must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EncodingConfig::default();
        assert_eq!(config.input, PathBuf::from("test.csv"));
        assert_eq!(config.column, "device");
        assert_eq!(config.handle_unknown, HandleUnknown::Error);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EncodingConfig::new()
            .with_input("data/events.csv")
            .with_column("browser")
            .with_handle_unknown(HandleUnknown::Ignore)
            .with_output("out.csv");

        assert_eq!(config.column, "browser");
        assert_eq!(config.handle_unknown, HandleUnknown::Ignore);
        assert_eq!(config.output, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"column": "os", "handle_unknown": "ignore"}}"#).unwrap();

        let config = EncodingConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.column, "os");
        assert_eq!(config.handle_unknown, HandleUnknown::Ignore);
        assert_eq!(config.input, PathBuf::from("test.csv"));
    }

    #[test]
    fn test_validate_empty_column() {
        let config = EncodingConfig::new().with_column(" ");
        assert!(matches!(config.validate(), Err(EncodeError::ConfigError(_))));
    }
}
