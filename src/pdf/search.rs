//! Page text extraction and search-hit serialization

use log::warn;

use super::engine::PdfEngine;
use super::error::PdfFault;
use super::types::MatchRect;
use crate::text_buffer::{ChunkedText, DEFAULT_CHUNK_SIZE};

/// Raw text of one page as an owned string
pub fn extract_page_text<E: PdfEngine>(engine: &E, page_index: usize) -> Result<String, PdfFault> {
    let page = engine.load_page(page_index).inspect_err(|e| {
        warn!("Page {} not found: {e}", page_index + 1);
    })?;

    match engine.page_text(&page)? {
        Some(text) => Ok(text),
        None => {
            warn!("No text found on page {}", page_index + 1);
            Err(PdfFault::NoTextOnPage { page: page_index })
        }
    }
}

/// Bounding boxes of every occurrence of `query` on a page.
///
/// Zero hits is an error, not an empty list.
pub fn find_match_rects<E: PdfEngine>(
    engine: &E,
    page_index: usize,
    query: &str,
) -> Result<Vec<MatchRect>, PdfFault> {
    if query.is_empty() {
        return Err(PdfFault::EmptyQuery);
    }

    let page = engine.load_page(page_index)?;
    let rects = engine.search_page(&page, query)?;
    if rects.is_empty() {
        return Err(PdfFault::NoSearchMatches { page: page_index });
    }
    Ok(rects)
}

/// Search a page and serialize the hits as `"[x1, y1, x2, y2] "` items
pub fn find_text_rectangles<E: PdfEngine>(
    engine: &E,
    page_index: usize,
    query: &str,
    chunk_size: usize,
) -> Result<String, PdfFault> {
    let rects = find_match_rects(engine, page_index, query)?;
    format_match_rects(&rects, chunk_size)
}

/// Serialize rectangles with integer-truncated coordinates, each followed by
/// a space
pub fn format_match_rects(rects: &[MatchRect], chunk_size: usize) -> Result<String, PdfFault> {
    let mut text = ChunkedText::with_chunk_size(chunk_size)?;
    for rect in rects {
        let [x1, y1, x2, y2] = rect.truncated();
        text.append("[")?;
        text.append_int(i64::from(x1))?;
        text.append(", ")?;
        text.append_int(i64::from(y1))?;
        text.append(", ")?;
        text.append_int(i64::from(x2))?;
        text.append(", ")?;
        text.append_int(i64::from(y2))?;
        text.append("] ")?;
    }
    Ok(text.into_string())
}

/// Serialize with the default chunk size
pub fn format_match_rects_default(rects: &[MatchRect]) -> Result<String, PdfFault> {
    format_match_rects(rects, DEFAULT_CHUNK_SIZE)
}

/// Parse a serialized rectangle list back into integer coordinates.
///
/// Malformed items are skipped.
pub fn parse_match_rects(text: &str) -> Vec<[i32; 4]> {
    text.split(']')
        .filter_map(|item| {
            let body = item.trim().strip_prefix('[')?;
            let coords: Vec<i32> = body
                .split(',')
                .map(|n| n.trim().parse())
                .collect::<Result<_, _>>()
                .ok()?;
            <[i32; 4]>::try_from(coords).ok()
        })
        .collect()
}
