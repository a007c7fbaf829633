//! Document metadata housekeeping
//!
//! Directory checks, duplicate scanning of metadata tables and content-based
//! PDF identifiers. Every operation is a synchronous one-shot call.

pub mod core;
pub mod scanner;
pub mod reporting;

pub use self::core::{directory, doc_id};
pub use self::scanner::{duplicate_detector, table_loader};
pub use self::reporting::report_writer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::directory::{check_directory_exists, ensure_directory, DirectoryStatus};
    pub use crate::core::doc_id::{
        compute_doc_id, compute_doc_id_detailed, extract_all_text, identify_text, DocumentId,
        DocumentIdentity, ExtractedText, PageSource, PageWarning, PdfPages, EMPTY_DOCUMENT,
    };
    pub use crate::scanner::duplicate_detector::{
        find_column_duplicates, find_table_duplicates, scan_duplicates, ColumnDuplicates,
        DuplicateGroup, DuplicateReport, ScanOutcome,
    };
    pub use crate::scanner::table_loader::MetadataTable;
    pub use crate::reporting::report_writer::{render_json_report, render_text_report, write_report};
}
