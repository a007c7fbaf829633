//! Duplicate report rendering

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::scanner::duplicate_detector::DuplicateReport;

/// Render a duplicate report as plain text
///
/// # Arguments
/// * `source` - Path of the scanned table, shown in the header
/// * `report` - Scan results
pub fn render_text_report(source: &Path, report: &DuplicateReport) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "Duplicate Scan Report")?;
    writeln!(out, "=====================")?;
    writeln!(out, "Table: {}", source.display())?;
    writeln!(out, "Columns checked: {}", report.columns.len())?;
    writeln!(out)?;

    for column in &report.columns {
        if !column.has_duplicates() {
            writeln!(out, "No duplicates in '{}'.", column.column)?;
            continue;
        }

        writeln!(out, "Duplicate found in '{}':", column.column)?;
        writeln!(
            out,
            "  {} group(s), {} row(s)",
            column.groups.len(),
            column.duplicate_row_count()
        )?;
        for group in &column.groups {
            let rows: Vec<String> = group.rows.iter().map(|r| r.to_string()).collect();
            writeln!(out, "    {:?} -> rows {}", group.value, rows.join(", "))?;
        }
    }

    Ok(out)
}

/// Render a duplicate report as pretty-printed JSON
pub fn render_json_report(report: &DuplicateReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize duplicate report")
}

/// Write a duplicate report to a file
///
/// # Arguments
/// * `output_path` - Path to output file
/// * `source` - Path of the scanned table
/// * `report` - Scan results
/// * `json` - Write JSON instead of plain text
pub fn write_report(
    output_path: &Path,
    source: &Path,
    report: &DuplicateReport,
    json: bool,
) -> Result<()> {
    let content = if json {
        render_json_report(report)?
    } else {
        render_text_report(source, report)?
    };

    fs::write(output_path, content)
        .with_context(|| format!("Failed to write report {}", output_path.display()))
}
