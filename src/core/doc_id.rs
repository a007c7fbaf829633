//! Content-based document identifiers
//!
//! A document's identifier is a UUID v5 over its full extracted text, so two
//! PDFs with the same text get the same identifier regardless of metadata,
//! compression or object layout.

use anyhow::{anyhow, Context, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

/// Sentinel returned for documents without any extractable text
pub const EMPTY_DOCUMENT: &str = "EMPTY_DOCUMENT";

/// Namespace the identifier is derived under
pub const DOC_ID_NAMESPACE: Uuid = Uuid::NAMESPACE_DNS;

/// Identifier of a document's text content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentId {
    /// Every page extracted to empty or whitespace-only text
    Empty,
    /// UUID v5 of the concatenated page text
    Content(Uuid),
}

impl DocumentId {
    pub fn is_empty(&self) -> bool {
        matches!(self, DocumentId::Empty)
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            DocumentId::Empty => None,
            DocumentId::Content(uuid) => Some(*uuid),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Empty => f.write_str(EMPTY_DOCUMENT),
            DocumentId::Content(uuid) => write!(f, "{}", uuid.hyphenated()),
        }
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A page whose text could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWarning {
    /// 0-based page index
    pub page: usize,
    pub message: String,
}

/// Concatenated text of a document plus the pages that failed along the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub warnings: Vec<PageWarning>,
}

/// A paginated source of text
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Extract the text of the page at 0-based `index`
    fn page_text(&self, index: usize) -> Result<String>;
}

/// Everything learned while identifying a single document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentIdentity {
    pub id: DocumentId,
    pub page_count: usize,
    pub warnings: Vec<PageWarning>,
}

/// Derive the identifier for already-extracted text
pub fn identify_text(text: &str) -> DocumentId {
    if text.trim().is_empty() {
        DocumentId::Empty
    } else {
        DocumentId::Content(Uuid::new_v5(&DOC_ID_NAMESPACE, text.as_bytes()))
    }
}

/// Extract all pages in order, substituting empty text for pages that fail
pub fn extract_all_text<S: PageSource + ?Sized>(source: &S) -> ExtractedText {
    (0..source.page_count()).fold(ExtractedText::default(), |mut acc, page| {
        match source.page_text(page) {
            Ok(text) => acc.text.push_str(&text),
            Err(e) => acc.warnings.push(PageWarning {
                page,
                message: format!("{:#}", e),
            }),
        }
        acc
    })
}

/// Pages of a parsed PDF
pub struct PdfPages {
    doc: lopdf::Document,
    page_numbers: Vec<u32>,
}

impl PdfPages {
    /// Open and parse the PDF at `path`
    ///
    /// Parser panics on malformed input are caught and turned into errors.
    pub fn open(path: &Path) -> Result<Self> {
        let path_buf = path.to_path_buf();
        let doc = panic::catch_unwind(AssertUnwindSafe(|| lopdf::Document::load(&path_buf)))
            .map_err(|_| anyhow!("Panic while parsing PDF"))
            .and_then(|loaded| loaded.map_err(anyhow::Error::from))
            .with_context(|| format!("Failed to open PDF {}", path.display()))?;

        // get_pages is keyed by 1-based page number in document order
        let page_numbers = doc.get_pages().keys().copied().collect();
        Ok(Self { doc, page_numbers })
    }
}

impl PageSource for PdfPages {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_number = *self
            .page_numbers
            .get(index)
            .ok_or_else(|| anyhow!("Page index {} out of range", index))?;

        match panic::catch_unwind(AssertUnwindSafe(|| self.doc.extract_text(&[page_number]))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(e.into()),
            Err(_panic) => Err(anyhow!("Panic during text extraction")),
        }
    }
}

/// Identify the PDF at `path`, keeping page count and warnings
///
/// Fails only when the file cannot be read or parsed as a PDF at all.
pub fn compute_doc_id_detailed(path: &Path) -> Result<DocumentIdentity> {
    let pages = PdfPages::open(path)?;
    let extracted = extract_all_text(&pages);

    for warning in &extracted.warnings {
        warn!(
            "Failed to extract text from page {} of {}: {}",
            warning.page,
            path.display(),
            warning.message
        );
    }

    let id = identify_text(&extracted.text);
    debug!(path = %path.display(), pages = pages.page_count(), %id, "computed document id");

    Ok(DocumentIdentity {
        id,
        page_count: pages.page_count(),
        warnings: extracted.warnings,
    })
}

/// Generate the content identifier of the PDF at `path`
///
/// # Returns
/// [`DocumentId::Content`] for documents with text, [`DocumentId::Empty`]
/// (`"EMPTY_DOCUMENT"`) otherwise
pub fn compute_doc_id(path: &Path) -> Result<DocumentId> {
    compute_doc_id_detailed(path).map(|identity| identity.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePages(Vec<Option<&'static str>>);

    impl PageSource for FakePages {
        fn page_count(&self) -> usize {
            self.0.len()
        }

        fn page_text(&self, index: usize) -> Result<String> {
            self.0[index]
                .map(str::to_string)
                .ok_or_else(|| anyhow!("broken content stream"))
        }
    }

    #[test]
    fn test_identify_text_known_value() {
        let id = identify_text("python.org");
        assert_eq!(id.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
    }

    #[test]
    fn test_identify_blank_text() {
        assert_eq!(identify_text(""), DocumentId::Empty);
        assert_eq!(identify_text(" \n\t "), DocumentId::Empty);
        assert_eq!(identify_text("\n").to_string(), EMPTY_DOCUMENT);
    }

    #[test]
    fn test_identifier_uses_untrimmed_text() {
        assert_ne!(identify_text("abc"), identify_text("abc\n"));
        assert_eq!(identify_text("abc\n"), identify_text("abc\n"));
    }

    #[test]
    fn test_failed_page_is_skipped_with_warning() {
        let pages = FakePages(vec![Some("foo"), None, Some("bar")]);
        let extracted = extract_all_text(&pages);

        assert_eq!(extracted.text, "foobar");
        assert_eq!(extracted.warnings.len(), 1);
        assert_eq!(extracted.warnings[0].page, 1);
        assert!(extracted.warnings[0].message.contains("broken content stream"));
        assert_eq!(identify_text(&extracted.text), identify_text("foobar"));
        assert!(!identify_text(&extracted.text).is_empty());
    }

    #[test]
    fn test_all_pages_blank_or_failing() {
        let pages = FakePages(vec![Some("  "), None, Some("\n")]);
        let extracted = extract_all_text(&pages);
        assert_eq!(identify_text(&extracted.text), DocumentId::Empty);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&DocumentId::Empty).unwrap();
        assert_eq!(json, "\"EMPTY_DOCUMENT\"");
    }
}
