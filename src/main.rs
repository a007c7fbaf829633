use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use doc_housekeeper::prelude::*;

/// Columns checked when none are given on the command line
const DEFAULT_COLUMNS: &[&str] = &["title", "publication_number", "document_id", "file_name"];

#[derive(Parser)]
#[command(name = "doc_housekeeper")]
#[command(about = "Document metadata housekeeping utilities", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a directory exists, optionally creating it
    EnsureDir {
        /// Directory to check
        path: PathBuf,

        /// Create the directory (and missing parents) if it does not exist
        #[arg(long)]
        create: bool,
    },

    /// Report duplicate values in columns of a metadata table (.csv, .xlsx, .xls, .ods)
    Duplicates {
        /// Metadata table to scan
        table: PathBuf,

        /// Columns to check, comma separated
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_COLUMNS.iter().map(|c| c.to_string()))]
        columns: Vec<String>,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Compute the content-based identifier of a PDF
    DocId {
        /// PDF file to identify
        pdf: PathBuf,

        /// Emit id, page count and page warnings as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("doc_housekeeper={}", default_level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::EnsureDir { path, create } => {
            let status = ensure_directory(&path, create);
            println!("{}", status.message(&path));
            Ok(if status.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Duplicates {
            table,
            columns,
            output,
            json,
        } => {
            let report = match scan_duplicates(&table, &columns) {
                ScanOutcome::Loaded(report) => report,
                ScanOutcome::LoadFailed { reason } => {
                    eprintln!("Error loading {}: {}", table.display(), reason);
                    return Ok(ExitCode::FAILURE);
                }
            };

            let rendered = if json {
                render_json_report(&report)?
            } else {
                render_text_report(&table, &report)?
            };
            print!("{}", rendered);
            if json {
                println!();
            }

            if let Some(output) = output {
                write_report(&output, &table, &report, json)?;
                println!("Report saved to: {}", output.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::DocId { pdf, json } => {
            let identity = compute_doc_id_detailed(&pdf)?;
            if json {
                let rendered = serde_json::to_string_pretty(&identity)
                    .context("Failed to serialize document identity")?;
                println!("{}", rendered);
            } else {
                println!("{}", identity.id);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
