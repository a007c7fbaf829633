//! Metadata table loading from CSV files and spreadsheets

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// In-memory metadata table: a header row plus data rows
///
/// Cells are `None` when missing (blank, whitespace-only or an error cell).
/// This is stricter than pandas `dropna`, which keeps whitespace-only strings.
/// Header names are trimmed, so `" title "` is looked up as `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl MetadataTable {
    /// Build a table, padding short rows with missing cells
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Load the table at `path`, choosing the reader by file extension
    ///
    /// `.csv` files go through the CSV reader; everything else is opened as a
    /// workbook and its first worksheet is used.
    pub fn load(path: &Path) -> Result<Self> {
        let is_csv = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            load_csv(path).with_context(|| format!("Failed to read CSV {}", path.display()))
        } else {
            load_workbook(path)
                .with_context(|| format!("Failed to read spreadsheet {}", path.display()))
        }
    }

    /// Position of the first column named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of column `name` in row order, or `None` if the column is absent
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).and_then(|cell| cell.as_deref())))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn normalize_cell(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn load_csv(path: &Path) -> Result<MetadataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(normalize_cell).collect());
    }

    Ok(MetadataTable::new(columns, rows))
}

fn data_to_cell(data: &Data) -> Option<String> {
    match data {
        Data::Empty | Data::Error(_) => None,
        other => normalize_cell(&other.to_string()),
    }
}

fn load_workbook(path: &Path) -> Result<MetadataTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Workbook has no worksheets")??;

    let mut sheet_rows = range.rows();
    let columns = match sheet_rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let rows = sheet_rows
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    Ok(MetadataTable::new(columns, rows))
}
