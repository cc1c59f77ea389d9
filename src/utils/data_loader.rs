//! Data loading and saving

use crate::error::{EncodeError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Supported table formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Parquet,
    Json,
}

impl FileFormat {
    /// Detect the format of a path; unknown extensions are read as CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "tsv" => FileFormat::Tsv,
            "parquet" | "pq" => FileFormat::Parquet,
            "json" | "jsonl" => FileFormat::Json,
            _ => FileFormat::Csv,
        }
    }
}

/// Data loader for tables with a header row
pub struct DataLoader {
    /// Rows sampled for schema inference
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(1000),
        }
    }

    /// Set the number of rows used to infer column types; `None` scans all
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        self.load_delimited(path.as_ref(), b',')
    }

    fn load_delimited(&self, path: &Path, delimiter: u8) -> Result<DataFrame> {
        let file = open(path)?;

        let parse_opts = CsvParseOptions::default().with_separator(delimiter);

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| EncodeError::DataError(format!("{}: {}", path.display(), e)))
    }

    /// Load a Parquet file
    pub fn load_parquet(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let file = open(path.as_ref())?;
        Ok(ParquetReader::new(file).finish()?)
    }

    /// Load a JSON file
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let file = open(path.as_ref())?;
        Ok(JsonReader::new(file).finish()?)
    }

    /// Detect file format from extension and load
    pub fn load_auto(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path);
        debug!(path = %path.display(), ?format, "Loading table");

        match format {
            FileFormat::Csv => self.load_delimited(path, b','),
            FileFormat::Tsv => self.load_delimited(path, b'\t'),
            FileFormat::Parquet => self.load_parquet(path),
            FileFormat::Json => self.load_json(path),
        }
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        EncodeError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

/// Save DataFrame to various formats
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).finish(df)?;
        Ok(())
    }

    /// Save to Parquet
    pub fn save_parquet(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        ParquetWriter::new(file).finish(df)?;
        Ok(())
    }

    /// Save to JSON
    pub fn save_json(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        JsonWriter::new(&mut file).finish(df)?;
        Ok(())
    }

    /// Save in the format implied by the extension
    pub fn save_auto(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match FileFormat::from_path(path) {
            FileFormat::Csv => Self::save_csv(df, path),
            FileFormat::Tsv => {
                let mut file = File::create(path)?;
                CsvWriter::new(&mut file).with_separator(b'\t').finish(df)?;
                Ok(())
            }
            FileFormat::Parquet => Self::save_parquet(df, path),
            FileFormat::Json => Self::save_json(df, path),
        }
    }
}
