//! Integration tests for content-based document identifiers
//!
//! Builds small real PDFs with lopdf and checks that identifiers depend on
//! extracted text only.

use doc_housekeeper::prelude::*;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

/// Helper to write a PDF with one page per entry of `pages`
///
/// `None` produces a page without any text operations.
fn write_pdf(path: &Path, pages: &[Option<&str>], compress: bool) {
    let fragments: Vec<Vec<&str>> = pages.iter().map(|p| p.iter().copied().collect()).collect();
    write_pdf_fragments(path, &fragments, None, compress);
}

/// Helper to write a PDF whose pages show each fragment with its own `Tj`
///
/// An empty fragment list produces a page without any text operations.
/// `title` adds an `Info` dictionary to the trailer.
fn write_pdf_fragments(path: &Path, pages: &[Vec<&str>], title: Option<&str>, compress: bool) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for fragments in pages {
        let mut operations = Vec::new();
        if !fragments.is_empty() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 24.into()]));
            operations.push(Operation::new("Td", vec![100.into(), 600.into()]));
            for fragment in fragments {
                operations.push(Operation::new("Tj", vec![Object::string_literal(*fragment)]));
            }
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    if compress {
        doc.compress();
    }
    doc.save(path).unwrap();
}

#[test]
fn test_same_text_same_id() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.pdf");
    let second = temp_dir.path().join("second.pdf");
    write_pdf(&first, &[Some("Annual report 2023"), Some("Appendix")], false);
    write_pdf_fragments(
        &second,
        &[vec!["Annual ", "report ", "2023"], vec!["Appendix"]],
        Some("Annual report"),
        true,
    );
    assert_ne!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    let first_identity = compute_doc_id_detailed(&first).unwrap();
    let second_identity = compute_doc_id_detailed(&second).unwrap();

    assert!(!first_identity.id.is_empty());
    assert_eq!(first_identity.id, second_identity.id);
    assert_eq!(first_identity.page_count, 2);
    assert_eq!(second_identity.page_count, 2);
    assert!(first_identity.warnings.is_empty());
}

#[test]
fn test_repeated_calls_are_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.pdf");
    write_pdf(&path, &[Some("Deterministic")], false);

    assert_eq!(compute_doc_id(&path).unwrap(), compute_doc_id(&path).unwrap());
}

#[test]
fn test_different_text_different_id() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.pdf");
    let second = temp_dir.path().join("second.pdf");
    write_pdf(&first, &[Some("Policy brief no. 1")], false);
    write_pdf(&second, &[Some("Policy brief no. 2")], false);

    assert_ne!(compute_doc_id(&first).unwrap(), compute_doc_id(&second).unwrap());
}

#[test]
fn test_id_is_derived_from_the_given_path() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.pdf");
    let second = temp_dir.path().join("second.pdf");
    write_pdf(&first, &[Some("alpha")], false);
    write_pdf(&second, &[Some("beta")], false);

    let first_id = compute_doc_id(&first).unwrap();
    let second_id = compute_doc_id(&second).unwrap();
    assert_ne!(first_id, second_id);
    assert_eq!(compute_doc_id(&first).unwrap(), first_id);
}

#[test]
fn test_pages_without_text_are_empty_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("blank.pdf");
    write_pdf(&path, &[None, None, None], false);

    let identity = compute_doc_id_detailed(&path).unwrap();
    assert_eq!(identity.id, DocumentId::Empty);
    assert_eq!(identity.id.to_string(), EMPTY_DOCUMENT);
    assert_eq!(identity.page_count, 3);
}

#[test]
fn test_whitespace_only_text_is_empty_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("spaces.pdf");
    write_pdf(&path, &[Some("   "), None], false);

    assert_eq!(compute_doc_id(&path).unwrap(), DocumentId::Empty);
}

#[test]
fn test_extracted_text_matches_identifier() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.pdf");
    write_pdf(&path, &[Some("Hello"), Some("World")], false);

    let pages = PdfPages::open(&path).unwrap();
    let extracted = extract_all_text(&pages);
    assert!(extracted.text.contains("Hello"));
    assert!(extracted.text.contains("World"));
    assert!(extracted.text.find("Hello") < extracted.text.find("World"));
    assert_eq!(identify_text(&extracted.text), compute_doc_id(&path).unwrap());
}

#[test]
fn test_garbage_file_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"This is not a PDF at all, just garbage data!").unwrap();
    temp_file.flush().unwrap();

    let err = compute_doc_id(temp_file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to open PDF"));
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(compute_doc_id(&temp_dir.path().join("absent.pdf")).is_err());
}

#[test]
fn test_empty_file_is_an_error() {
    let temp_file = NamedTempFile::new().unwrap();
    assert!(compute_doc_id(temp_file.path()).is_err());
}
