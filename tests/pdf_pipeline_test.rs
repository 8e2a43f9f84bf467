use pdfpane::pdf::boundary::{
    cleanup_pdf_document, extract_page_text, get_pdf_text_selection, get_pdf_toc,
    render_pdf_page_to_rgba_with_xoffset,
};
use pdfpane::pdf::parsing::toc_links::parse_toc_links;
use pdfpane::pdf::search::parse_match_rects;
use pdfpane::pdf::{
    BYTES_PER_PIXEL, Destination, DocumentOptions, MatchRect, OutlineNode, OutlineOptions,
    PdfDocument, PdfFault, RasterOptions, Rgba, TocTarget,
};
use pdfpane::test_utils::{FakeEngine, FakePage, INK};

fn paper() -> PdfDocument<FakeEngine> {
    let engine = FakeEngine::new()
        .with_pages(4, FakePage::sized(600.0, 800.0))
        .with_page(
            FakePage::letter()
                .with_text("Theorem 1. Every lemma is a theorem.\n")
                .with_matches(
                    "lemma",
                    vec![
                        MatchRect::new(72.9, 700.2, 110.5, 712.8),
                        MatchRect::new(300.0, 400.0, 338.7, 412.1),
                    ],
                ),
        )
        .with_destination("chapter.1", Destination::Page(0))
        .with_destination("section.1.1", Destination::Page(1))
        .with_destination("thm", Destination::Named("section.1.1".into()))
        .with_outline(vec![
            OutlineNode::named("Introduction", "chapter.1").with_children(vec![
                OutlineNode::named("Motivation", "section.1.1"),
                OutlineNode::uri("Project page", "https://example.org"),
            ]),
            OutlineNode::named("Main theorem", "thm"),
            OutlineNode::page("Appendix", 4),
        ]);
    PdfDocument::from_engine(engine)
}

#[test]
fn toc_lists_goto_entries_in_preorder() {
    let doc = paper();
    let toc = get_pdf_toc(Some(&doc)).expect("outline present");

    assert_eq!(
        toc,
        concat!(
            "- Introductionchapter.1@0\n",
            "  - Motivationsection.1.1@1\n",
            "- Main theoremthm@1\n",
            "- AppendixBookmark5\n",
        )
    );
}

#[test]
fn toc_links_feed_navigation() {
    let doc = paper();
    let toc = doc.toc().unwrap();
    let links = parse_toc_links(&toc);

    let labels: Vec<_> = links.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["- Introduction", "  - Motivation", "- Main theoremthm"]);
    let pages: Vec<_> = links.iter().map(|l| l.page()).collect();
    assert_eq!(pages, vec![Some(0), Some(1), Some(1)]);
}

#[test]
fn structured_outline_matches_text() {
    let doc = paper();
    let entries = doc.outline_entries().unwrap();

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[1].level, 1);
    assert_eq!(
        entries[2].target,
        TocTarget::Named {
            name: "thm".into(),
            page: 1
        }
    );
    assert_eq!(entries[3].target, TocTarget::Page(4));
}

#[test]
fn render_fills_caller_buffer() {
    let doc = paper();
    let (width, height) = (200u32, 300u32);
    let mut out = vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL];

    let rendered =
        render_pdf_page_to_rgba_with_xoffset(Some(&doc), 0, &mut out, width, height, 0.0);

    assert_eq!(rendered, 300);
    // 800pt at scale 1/3 covers 266 rows; the rest is background
    let row = |y: usize| &out[y * width as usize * 4..(y + 1) * width as usize * 4];
    assert_eq!(&row(10)[..4], &INK.0);
    assert_eq!(&row(299)[..4], &Rgba::MINT.0);
    assert_eq!(doc.engine().live_pages(), 0);
    assert_eq!(doc.engine().live_surfaces(), 0);
}

#[test]
fn inset_leaves_margins_on_both_sides() {
    let doc = paper();
    let width = 100u32;
    let mut out = vec![0u8; width as usize * 10 * BYTES_PER_PIXEL];

    // 600pt page + 2 * 100pt inset = 800pt -> scale 1/8, content spans x 12..87
    assert_eq!(doc.render_page(0, &mut out, width, 10, 100.0).unwrap(), 10);
    let px = |x: usize| &out[x * 4..x * 4 + 4];
    assert_eq!(px(5), &Rgba::MINT.0);
    assert_eq!(px(50), &INK.0);
    assert_eq!(px(95), &Rgba::MINT.0);
}

#[test]
fn render_failures_return_zero_and_keep_buffer() {
    let doc = paper();
    let mut out = vec![42u8; 10 * 10 * BYTES_PER_PIXEL];

    assert_eq!(
        render_pdf_page_to_rgba_with_xoffset(Some(&doc), 5, &mut out, 10, 10, 0.0),
        0
    );
    assert_eq!(
        render_pdf_page_to_rgba_with_xoffset(Some(&doc), 0, &mut out, 10, 10, -400.0),
        0
    );
    assert!(out.iter().all(|&b| b == 42));
}

#[test]
fn search_serializes_and_parses_back() {
    let doc = paper();
    let text = get_pdf_text_selection(Some(&doc), 4, Some("lemma")).unwrap();

    assert_eq!(text, "[72, 700, 110, 712] [300, 400, 338, 412] ");
    assert_eq!(
        parse_match_rects(&text),
        vec![[72, 700, 110, 712], [300, 400, 338, 412]]
    );
    assert_eq!(get_pdf_text_selection(Some(&doc), 4, Some("corollary")), None);
}

#[test]
fn search_reports_the_specific_fault() {
    let doc = paper();
    assert!(matches!(
        doc.match_rects(4, "corollary"),
        Err(PdfFault::NoSearchMatches { page: 4 })
    ));
    assert!(matches!(doc.match_rects(4, ""), Err(PdfFault::EmptyQuery)));
    assert!(matches!(
        doc.match_rects(9, "lemma"),
        Err(PdfFault::PageIndexOutOfRange { page: 9, .. })
    ));
}

#[test]
fn page_text_round_trip() {
    let doc = paper();
    assert_eq!(
        extract_page_text(Some(&doc), 4).as_deref(),
        Some("Theorem 1. Every lemma is a theorem.\n")
    );
    assert_eq!(extract_page_text(Some(&doc), 0), None);
}

#[test]
fn options_change_background_and_line_limit() {
    let doc = paper().with_options(DocumentOptions {
        raster: RasterOptions {
            background: Rgba::opaque(10, 20, 30),
        },
        outline: OutlineOptions {
            chunk_size: 16,
            line_limit: Some(8),
        },
        text_chunk_size: 16,
    });

    assert_eq!(doc.toc().unwrap(), "- Intro\n  - Mot\n- Main \n- Appen\n");

    let mut out = vec![0u8; 4 * 100 * BYTES_PER_PIXEL];
    doc.render_page(0, &mut out, 4, 100, 0.0).unwrap();
    assert_eq!(&out[out.len() - 4..], &[10, 20, 30, 255]);
}

#[test]
fn cleanup_is_idempotent() {
    let mut slot = Some(paper());
    cleanup_pdf_document(&mut slot);
    cleanup_pdf_document(&mut slot);
    assert!(slot.is_none());
    assert_eq!(get_pdf_toc(slot.as_ref()), None);
}
