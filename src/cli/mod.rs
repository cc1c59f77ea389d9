//! catencode CLI Module
//!
//! Command-line interface for label and one-hot encoding of CSV columns.

use clap::{Args, Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::preprocessing::{
    summarize, CategoricalPipeline, EncodingConfig, HandleUnknown, LabelEncoder, OneHotEncoder,
};
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

// Progress goes to stderr; stdout carries only the table.

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    eprint!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    eprintln!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    eprintln!();
    eprintln!("  {}", title.white().bold());
    eprintln!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "catencode")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Label and one-hot encoding of categorical columns")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Label-encode a column, then one-hot expand the labels
    Encode(EncodeArgs),

    /// Append `<column>_label` with the integer label of each category
    Label {
        /// Input data file (CSV, TSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Categorical column name
        #[arg(short, long)]
        column: String,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append `<column>_onehot_<i>` indicator columns
    Onehot {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Column to expand, usually an integer label
        #[arg(short, long)]
        column: String,

        /// Unknown category policy (error, ignore)
        #[arg(long, default_value = "error")]
        handle_unknown: HandleUnknown,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// List the categories and labels of this column
        #[arg(short, long)]
        column: Option<String>,
    },
}

/// Flags of the `encode` command; unset flags fall back to the config file,
/// then to [`EncodingConfig::default`]
#[derive(Args, Debug, Clone, Default)]
pub struct EncodeArgs {
    /// Input data file [default: test.csv]
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Categorical column name [default: device]
    #[arg(short, long)]
    pub column: Option<String>,

    /// Unknown category policy (error, ignore)
    #[arg(long)]
    pub handle_unknown: Option<HandleUnknown>,

    /// Output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the fitted encoders as JSON
    #[arg(long)]
    pub save_state: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl EncodeArgs {
    /// Merge flags over the config file and defaults
    pub fn to_config(&self) -> crate::Result<EncodingConfig> {
        let mut config = match &self.config {
            Some(path) => EncodingConfig::from_json_file(path)?,
            None => EncodingConfig::default(),
        };

        if let Some(data) = &self.data {
            config.input = data.clone();
        }
        if let Some(column) = &self.column {
            config.column = column.clone();
        }
        if let Some(handle_unknown) = self.handle_unknown {
            config.handle_unknown = handle_unknown;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if let Some(state) = &self.save_state {
            config.state_path = Some(state.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

// ─── Data loading ──────────────────────────────────────────────────────────────

pub fn load_data(path: &Path) -> anyhow::Result<DataFrame> {
    step_run("Loading data");
    let start = Instant::now();
    let df = DataLoader::new().load_auto(path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));
    Ok(df)
}

fn emit(mut df: DataFrame, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            step_run(&format!("Saving → {}", path.display()));
            DataSaver::save_auto(&mut df, path)?;
            step_done(&format!("{} rows × {} cols", df.height(), df.width()));
        }
        None => {
            println!("{}", df);
        }
    }
    eprintln!();
    Ok(())
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_encode(args: &EncodeArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    section("Encode");

    let df = load_data(&config.input)?;

    step_run(&format!("Encoding {}", config.column.cyan()));
    let start = Instant::now();
    let mut pipeline = CategoricalPipeline::new(config.clone());
    let encoded = pipeline.run(&df)?;
    step_done(&format!(
        "{} classes in {:?}",
        pipeline.label_encoder().n_classes(),
        start.elapsed()
    ));

    if let Some(path) = &config.state_path {
        step_run(&format!("Saving encoders → {}", path.display()));
        pipeline.state()?.save_json(path)?;
        step_done("");
    }

    emit(encoded, config.output.as_deref())
}

pub fn cmd_label(data_path: &Path, column: &str, output: Option<&Path>) -> anyhow::Result<()> {
    section("Label");

    let df = load_data(data_path)?;

    step_run(&format!("Encoding {}", column.cyan()));
    let mut encoder = LabelEncoder::new();
    let labeled = encoder.fit_transform(&df, column)?;
    step_done(&format!("{} classes", encoder.n_classes()));

    emit(labeled, output)
}

pub fn cmd_onehot(
    data_path: &Path,
    column: &str,
    handle_unknown: HandleUnknown,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("One-hot");

    let df = load_data(data_path)?;

    step_run(&format!("Expanding {}", column.cyan()));
    let mut encoder = OneHotEncoder::new(handle_unknown);
    let expanded = encoder.fit_transform(&df, column)?;
    step_done(&format!("{} indicator columns", expanded.width() - df.width()));

    emit(expanded, output)
}

pub fn cmd_info(data_path: &Path, column: Option<&str>) -> anyhow::Result<()> {
    section("Data Info");

    let df = DataLoader::new().load_auto(data_path)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!();

    println!("  {:<20} {:<12} {:>6} {:>8}", muted("Column"), muted("Type"), muted("Nulls"), muted("Unique"));
    println!("  {}", dim(&"─".repeat(50)));

    for summary in summarize(&df)? {
        println!(
            "  {:<20} {:<12} {:>6} {:>8}",
            summary.name,
            summary.dtype.truecolor(140, 140, 140),
            summary.null_count,
            summary.unique_count
        );
    }

    if let Some(column) = column {
        let mut encoder = LabelEncoder::new();
        encoder.fit(&df, column)?;

        section(&format!("Categories of {}", column));
        println!("  {:>6}  {}", muted("Label"), muted("Value"));
        for (label, class) in encoder.classes().unwrap_or_default().iter().enumerate() {
            println!("  {:>6}  {}", label, class.white());
        }
    }

    println!();
    Ok(())
}
