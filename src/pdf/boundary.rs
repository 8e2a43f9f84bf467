//! Sentinel-style entry points
//!
//! Thin wrappers over [`PdfDocument`] for callers that only need to know
//! whether an operation worked. The specific [`PdfFault`] is logged and
//! then collapsed into `None` or `0`.

use log::{error, warn};

use super::document::PdfDocument;
use super::engine::PdfEngine;
use super::error::PdfFault;

fn report(operation: &str, fault: &PdfFault) {
    if fault.is_allocation() {
        error!("{operation}: ran out of memory assembling the result: {fault}");
        return;
    }
    match fault {
        PdfFault::NoSearchMatches { .. } | PdfFault::NoTextOnPage { .. } => {
            warn!("{operation}: {fault}");
        }
        _ => error!("{operation}: {fault}"),
    }
}

/// Open a document, `None` on any failure
#[cfg(feature = "pdf")]
pub fn init_pdf_document(path: &str) -> Option<PdfDocument<super::mupdf_engine::MupdfEngine>> {
    PdfDocument::open(path)
        .inspect_err(|e| report("init_pdf_document", e))
        .ok()
}

/// Release a document. Calling it again on the emptied slot does nothing.
pub fn cleanup_pdf_document<E: PdfEngine>(document: &mut Option<PdfDocument<E>>) {
    drop(document.take());
}

/// Render into `output`; returns the rendered height or `0` on failure.
///
/// `output` is untouched unless the whole page rendered.
pub fn render_pdf_page_to_rgba_with_xoffset<E: PdfEngine>(
    document: Option<&PdfDocument<E>>,
    page: usize,
    output: &mut [u8],
    width: u32,
    height: u32,
    x_offset: f32,
) -> u32 {
    let Some(document) = document else {
        error!("render_pdf_page_to_rgba_with_xoffset: no document");
        return 0;
    };
    document
        .render_page(page, output, width, height, x_offset)
        .unwrap_or_else(|e| {
            report("render_pdf_page_to_rgba_with_xoffset", &e);
            0
        })
}

pub fn get_pdf_toc<E: PdfEngine>(document: Option<&PdfDocument<E>>) -> Option<String> {
    let document = document?;
    document
        .toc()
        .inspect_err(|e| report("get_pdf_toc", e))
        .ok()
}

pub fn extract_page_text<E: PdfEngine>(
    document: Option<&PdfDocument<E>>,
    page: usize,
) -> Option<String> {
    let document = document?;
    document
        .page_text(page)
        .inspect_err(|e| report("extract_page_text", e))
        .ok()
}

/// Match rectangles serialized as `"[x1, y1, x2, y2] "`; `None` when the
/// query is missing or empty, or nothing matched.
pub fn get_pdf_text_selection<E: PdfEngine>(
    document: Option<&PdfDocument<E>>,
    page: usize,
    query: Option<&str>,
) -> Option<String> {
    let document = document?;
    let query = query?;
    document
        .text_selection(page, query)
        .inspect_err(|e| report("get_pdf_text_selection", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeEngine, FakePage};

    #[test]
    fn missing_document_gives_sentinels() {
        let none: Option<&PdfDocument<FakeEngine>> = None;
        let mut out = vec![9u8; 16];
        assert_eq!(
            render_pdf_page_to_rgba_with_xoffset(none, 0, &mut out, 2, 2, 0.0),
            0
        );
        assert!(out.iter().all(|&b| b == 9));
        assert_eq!(get_pdf_toc(none), None);
        assert_eq!(extract_page_text(none, 0), None);
        assert_eq!(get_pdf_text_selection(none, 0, Some("x")), None);
    }

    #[test]
    fn cleanup_twice_is_a_no_op() {
        let mut slot = Some(PdfDocument::from_engine(
            FakeEngine::new().with_page(FakePage::letter()),
        ));
        cleanup_pdf_document(&mut slot);
        assert!(slot.is_none());
        cleanup_pdf_document(&mut slot);
        assert!(slot.is_none());
    }

    #[test]
    fn missing_query_is_a_failure() {
        let doc = PdfDocument::from_engine(FakeEngine::new().with_page(FakePage::letter()));
        assert_eq!(get_pdf_text_selection(Some(&doc), 0, None), None);
        assert_eq!(get_pdf_text_selection(Some(&doc), 0, Some("")), None);
    }
}
