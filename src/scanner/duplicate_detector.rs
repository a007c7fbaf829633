//! Duplicate value detection across metadata table columns

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info};

use super::table_loader::MetadataTable;

/// Rows sharing one value in a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub value: String,
    /// 0-based data row indices, ascending
    pub rows: Vec<usize>,
}

/// Duplicate findings for a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDuplicates {
    pub column: String,
    /// Groups ordered by the first row their value appears in
    pub groups: Vec<DuplicateGroup>,
}

impl ColumnDuplicates {
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Total number of rows involved in a duplicate
    pub fn duplicate_row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

/// Per-column results of a scan, in the order the columns were requested
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    pub columns: Vec<ColumnDuplicates>,
}

impl DuplicateReport {
    pub fn has_duplicates(&self) -> bool {
        self.columns.iter().any(ColumnDuplicates::has_duplicates)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDuplicates> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Result of [`scan_duplicates`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    Loaded(DuplicateReport),
    LoadFailed { reason: String },
}

impl ScanOutcome {
    pub fn report(&self) -> Option<&DuplicateReport> {
        match self {
            ScanOutcome::Loaded(report) => Some(report),
            ScanOutcome::LoadFailed { .. } => None,
        }
    }
}

/// Find values repeated in `column`, ignoring rows where it is missing
///
/// # Returns
/// `None` if the table has no such column
pub fn find_column_duplicates(table: &MetadataTable, column: &str) -> Option<ColumnDuplicates> {
    let mut by_value: HashMap<&str, Vec<usize>> = HashMap::new();

    for (row, value) in table.column_values(column)?.enumerate() {
        if let Some(value) = value {
            by_value.entry(value).or_insert_with(Vec::new).push(row);
        }
    }

    let mut groups: Vec<DuplicateGroup> = by_value
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(value, rows)| DuplicateGroup {
            value: value.to_string(),
            rows,
        })
        .collect();
    groups.sort_by_key(|g| g.rows[0]);

    Some(ColumnDuplicates {
        column: column.to_string(),
        groups,
    })
}

/// Check `columns` of an already loaded table; absent columns are skipped
pub fn find_table_duplicates<S: AsRef<str>>(table: &MetadataTable, columns: &[S]) -> DuplicateReport {
    DuplicateReport {
        columns: columns
            .iter()
            .filter_map(|column| find_column_duplicates(table, column.as_ref()))
            .collect(),
    }
}

/// Load the table at `table_path` and report duplicates in `columns`
///
/// Load failures are logged and returned as [`ScanOutcome::LoadFailed`]
/// rather than propagated.
pub fn scan_duplicates<S: AsRef<str>>(table_path: &Path, columns: &[S]) -> ScanOutcome {
    let table = match MetadataTable::load(table_path) {
        Ok(table) => table,
        Err(e) => {
            let reason = format!("{:#}", e);
            error!("An error occurred: {}", reason);
            return ScanOutcome::LoadFailed { reason };
        }
    };

    let report = find_table_duplicates(&table, columns);
    for column in &report.columns {
        if column.has_duplicates() {
            info!("Duplicate found in '{}':", column.column);
            for group in &column.groups {
                for row in &group.rows {
                    info!("  row {}: {}", row, group.value);
                }
            }
        } else {
            info!("No duplicates in '{}'.", column.column);
        }
    }

    ScanOutcome::Loaded(report)
}
