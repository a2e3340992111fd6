#![allow(dead_code)]

use lopdf::{Document as LopdfDocument, Object, ObjectId};

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// Every object reference in the document, paired with whether it resolves.
pub fn dangling_references(doc: &LopdfDocument) -> Vec<ObjectId> {
    fn walk(doc: &LopdfDocument, object: &Object, out: &mut Vec<ObjectId>) {
        match object {
            Object::Reference(id) => {
                if doc.get_object(*id).is_err() {
                    out.push(*id);
                }
            }
            Object::Array(items) => items.iter().for_each(|item| walk(doc, item, out)),
            Object::Dictionary(dict) => dict.iter().for_each(|(_, value)| walk(doc, value, out)),
            Object::Stream(stream) => stream.dict.iter().for_each(|(_, value)| walk(doc, value, out)),
            _ => {}
        }
    }

    let mut out = Vec::new();
    for object in doc.objects.values() {
        walk(doc, object, &mut out);
    }
    walk(doc, &Object::Dictionary(doc.trailer.clone()), &mut out);
    out
}

/// Raw, undecoded content of the first page.
pub fn first_page_content(doc: &LopdfDocument) -> Vec<u8> {
    doc.get_pages()
        .values()
        .next()
        .and_then(|page_id| doc.get_page_content(*page_id).ok())
        .unwrap_or_default()
}

// ============================================================================
// Fluent Assertion Macros
// ============================================================================

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert minimum number of pages
#[macro_export]
macro_rules! assert_pdf_min_pages {
    ($pdf:expr, $min:expr) => {
        assert!(
            $pdf.page_count() >= $min,
            "Expected at least {} pages, got {}",
            $min,
            $pdf.page_count()
        );
    };
}
