//! Table of contents flattening
//!
//! Walks the bookmark tree depth-first (parent before children, siblings in
//! document order) and turns every go-to entry into one indented line:
//!
//! ```text
//! - Chapter 1Bookmark3
//!   - Section 1.1sec:intro@4
//! ```

use crate::pdf::engine::PdfEngine;
use crate::pdf::error::PdfFault;
use crate::pdf::types::{Destination, OutlineAction, OutlineNode, TocEntry, TocTarget};
use crate::text_buffer::{ChunkedText, DEFAULT_CHUNK_SIZE};

/// Placeholder for entries without a title
pub const UNTITLED: &str = "(Untitled)";

/// Page reported for named destinations that cannot be resolved
pub const UNRESOLVED_PAGE: i32 = -1;

const INDENT: &str = "  ";
const BULLET: &str = "- ";

/// Outline serialization knobs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Growth increment of the output buffer
    pub chunk_size: usize,
    /// Byte budget per line including the newline; longer lines are cut
    pub line_limit: Option<usize>,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            line_limit: None,
        }
    }
}

/// Flatten the document outline into indented text.
///
/// An outline with no entries yields an empty string; a document without
/// any outline is `NoOutlineAvailable`.
pub fn flatten_outline<E: PdfEngine>(
    engine: &E,
    options: &OutlineOptions,
) -> Result<String, PdfFault> {
    let entries = extract_toc(engine)?;
    let mut text = ChunkedText::with_chunk_size(options.chunk_size)?;
    for entry in &entries {
        write_entry(&mut text, entry, options.line_limit)?;
    }
    Ok(text.into_string())
}

/// Flatten the outline into structured entries
pub fn extract_toc<E: PdfEngine>(engine: &E) -> Result<Vec<TocEntry>, PdfFault> {
    let outline = engine.outline()?.ok_or(PdfFault::NoOutlineAvailable)?;
    let mut entries = Vec::new();
    flatten_outlines(engine, &outline, 0, &mut entries);
    Ok(entries)
}

fn flatten_outlines<E: PdfEngine>(
    engine: &E,
    outlines: &[OutlineNode],
    level: usize,
    entries: &mut Vec<TocEntry>,
) {
    for outline in outlines {
        // Entries without any action are dropped together with their subtree
        let Some(action) = &outline.action else {
            continue;
        };

        if let OutlineAction::GoTo(dest) = action {
            let target = match dest {
                Some(Destination::Page(page)) => TocTarget::Page(*page),
                Some(Destination::Named(name)) => TocTarget::Named {
                    name: name.clone(),
                    page: resolve_named_page(engine, name),
                },
                None => TocTarget::Unspecified,
            };
            entries.push(TocEntry {
                title: outline
                    .title
                    .clone()
                    .unwrap_or_else(|| UNTITLED.to_string()),
                level,
                target,
            });
        }

        if !outline.children.is_empty() {
            flatten_outlines(engine, &outline.children, level + 1, entries);
        }
    }
}

/// Page number behind a named destination.
///
/// Follows at most one further name; anything deeper is unresolved.
pub fn resolve_named_page<E: PdfEngine>(engine: &E, name: &str) -> i32 {
    match engine.find_destination(name) {
        Some(Destination::Page(page)) => page,
        Some(Destination::Named(inner)) => match engine.find_destination(&inner) {
            Some(Destination::Page(page)) => page,
            _ => UNRESOLVED_PAGE,
        },
        None => UNRESOLVED_PAGE,
    }
}

fn write_entry(
    text: &mut ChunkedText,
    entry: &TocEntry,
    line_limit: Option<usize>,
) -> Result<(), PdfFault> {
    let start = text.len();
    for _ in 0..entry.level {
        text.append(INDENT)?;
    }
    text.append(BULLET)?;
    text.append(&entry.title)?;

    match &entry.target {
        TocTarget::Named { name, page } => {
            text.append(name)?;
            text.append_char('@')?;
            text.append_int(i64::from(*page))?;
        }
        TocTarget::Page(page) => {
            text.append("Bookmark")?;
            text.append_int(i64::from(*page) + 1)?;
        }
        TocTarget::Unspecified => {}
    }

    if let Some(limit) = line_limit {
        text.truncate(start + limit.saturating_sub(1));
    }
    text.append_char('\n')?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeEngine;

    #[test]
    fn nested_direct_pages_are_indented() {
        let engine = FakeEngine::new().with_outline(vec![
            OutlineNode::page("Ch1", 2).with_children(vec![OutlineNode::page("S1.1", 4)]),
        ]);

        let toc = flatten_outline(&engine, &OutlineOptions::default()).unwrap();
        assert_eq!(toc, "- Ch1Bookmark3\n  - S1.1Bookmark5\n");
    }

    #[test]
    fn empty_outline_is_empty_text() {
        let engine = FakeEngine::new().with_outline(Vec::new());
        assert_eq!(flatten_outline(&engine, &OutlineOptions::default()).unwrap(), "");
    }

    #[test]
    fn missing_outline_is_an_error() {
        let engine = FakeEngine::new();
        assert!(matches!(
            flatten_outline(&engine, &OutlineOptions::default()),
            Err(PdfFault::NoOutlineAvailable)
        ));
    }

    #[test]
    fn named_destinations_follow_one_indirection() {
        let engine = FakeEngine::new()
            .with_destination("intro", Destination::Page(7))
            .with_destination("alias", Destination::Named("intro".into()))
            .with_destination("alias2", Destination::Named("alias".into()))
            .with_outline(vec![
                OutlineNode::named("Intro", "intro"),
                OutlineNode::named("Alias", "alias"),
                OutlineNode::named("Too deep", "alias2"),
                OutlineNode::named("Gone", "missing"),
            ]);

        let toc = flatten_outline(&engine, &OutlineOptions::default()).unwrap();
        assert_eq!(
            toc,
            "- Introintro@7\n- Aliasalias@7\n- Too deepalias2@-1\n- Gonemissing@-1\n"
        );
    }

    #[test]
    fn non_goto_entries_are_skipped_but_children_kept() {
        let engine = FakeEngine::new().with_outline(vec![
            OutlineNode::uri("Website", "https://example.com")
                .with_children(vec![OutlineNode::page("Inner", 0)]),
            OutlineNode::page("After", 1),
        ]);

        let toc = flatten_outline(&engine, &OutlineOptions::default()).unwrap();
        assert_eq!(toc, "  - InnerBookmark1\n- AfterBookmark2\n");
    }

    #[test]
    fn actionless_entries_drop_their_subtree() {
        let engine = FakeEngine::new().with_outline(vec![
            OutlineNode {
                title: Some("Hollow".into()),
                action: None,
                children: vec![OutlineNode::page("Hidden", 0)],
            },
            OutlineNode::page("Shown", 0),
        ]);

        let toc = flatten_outline(&engine, &OutlineOptions::default()).unwrap();
        assert_eq!(toc, "- ShownBookmark1\n");
    }

    #[test]
    fn untitled_and_destinationless_entries() {
        let engine = FakeEngine::new().with_outline(vec![
            OutlineNode {
                title: None,
                action: Some(OutlineAction::GoTo(Some(Destination::Page(0)))),
                children: Vec::new(),
            },
            OutlineNode {
                title: Some("Nowhere".into()),
                action: Some(OutlineAction::GoTo(None)),
                children: Vec::new(),
            },
        ]);

        let toc = flatten_outline(&engine, &OutlineOptions::default()).unwrap();
        assert_eq!(toc, "- (Untitled)Bookmark1\n- Nowhere\n");
    }

    #[test]
    fn line_limit_cuts_long_titles() {
        let engine = FakeEngine::new().with_outline(vec![
            OutlineNode::page("A very long chapter title", 0),
            OutlineNode::page("Short", 0),
        ]);
        let options = OutlineOptions {
            chunk_size: 8,
            line_limit: Some(11),
        };

        let toc = flatten_outline(&engine, &options).unwrap();
        assert_eq!(toc, "- A very l\n- ShortBoo\n");
    }

    #[test]
    fn small_chunks_still_hold_everything() {
        let children: Vec<_> = (0..50)
            .map(|i| OutlineNode::page(format!("Section {i}"), i))
            .collect();
        let engine = FakeEngine::new()
            .with_outline(vec![OutlineNode::page("Root", 0).with_children(children)]);
        let options = OutlineOptions {
            chunk_size: 16,
            line_limit: None,
        };

        let toc = flatten_outline(&engine, &options).unwrap();
        assert_eq!(toc.lines().count(), 51);
        assert!(toc.ends_with("  - Section 49Bookmark50\n"));
    }
}
