//! catencode - Main Entry Point
//!
//! Label-encodes a categorical column of a CSV file, one-hot expands the labels
//! and prints the result.

use catencode::cli::{cmd_encode, cmd_info, cmd_label, cmd_onehot, Cli, Commands, EncodeArgs};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, the encoded table to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catencode=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Encode(args)) => {
            cmd_encode(&args)?;
        }
        Some(Commands::Label { data, column, output }) => {
            cmd_label(&data, &column, output.as_deref())?;
        }
        Some(Commands::Onehot { data, column, handle_unknown, output }) => {
            cmd_onehot(&data, &column, handle_unknown, output.as_deref())?;
        }
        Some(Commands::Info { data, column }) => {
            cmd_info(&data, column.as_deref())?;
        }
        None => {
            // Default: encode `device` of ./test.csv and print
            cmd_encode(&EncodeArgs::default())?;
        }
    }

    Ok(())
}
