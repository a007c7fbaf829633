//! Metadata table loading and duplicate scanning

pub mod table_loader;
pub mod duplicate_detector;

pub use table_loader::MetadataTable;
pub use duplicate_detector::{
    find_column_duplicates, find_table_duplicates, scan_duplicates, ColumnDuplicates,
    DuplicateGroup, DuplicateReport, ScanOutcome,
};
