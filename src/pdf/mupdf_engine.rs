//! MuPDF-backed document engine

use log::debug;
use mupdf::{Colorspace, Document, Matrix, Page, Pixmap, TextPageFlags};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use super::engine::{BYTES_PER_PIXEL, PdfEngine, RasterSurface};
use super::error::PdfFault;
use super::types::{Destination, MatchRect, OutlineAction, OutlineNode, PageSize, Rgba};
use super::zoom::PageTransform;

/// Default cap on search hits per page
pub const DEFAULT_SEARCH_HIT_MAX: u32 = 512;

const FILE_SCHEME: &str = "file://";
const NAMED_DEST_PREFIX: &str = "nameddest=";
const PAGE_PREFIX: &str = "page=";

/// Characters MuPDF leaves unescaped in URI components
const URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A parsed PDF opened through MuPDF
pub struct MupdfEngine {
    doc: Document,
    search_hit_max: u32,
}

impl MupdfEngine {
    /// Open a document from a filesystem path or a `file://` URI
    pub fn open(path: &str) -> Result<Self, PdfFault> {
        let path = path.strip_prefix(FILE_SCHEME).unwrap_or(path);
        let doc = Document::open(path).map_err(|e| PdfFault::Open {
            path: path.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            doc,
            search_hit_max: DEFAULT_SEARCH_HIT_MAX,
        })
    }

    #[must_use]
    pub fn with_search_hit_max(mut self, hit_max: u32) -> Self {
        self.search_hit_max = hit_max.max(1);
        self
    }
}

/// RGBA pixmap with alpha, 4 bytes per pixel
pub struct MupdfSurface {
    pixmap: Pixmap,
}

impl RasterSurface for MupdfSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn stride(&self) -> usize {
        self.pixmap.stride() as usize
    }

    fn fill(&mut self, color: Rgba) {
        let width = self.pixmap.width() as usize;
        let stride = self.pixmap.stride() as usize;
        let samples = self.pixmap.samples_mut();
        for row in samples.chunks_mut(stride) {
            let row_bytes = (width * BYTES_PER_PIXEL).min(row.len());
            for px in row[..row_bytes].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&color.0);
            }
        }
    }

    fn samples(&self) -> &[u8] {
        self.pixmap.samples()
    }
}

/// Classify a bookmark URI.
///
/// MuPDF writes explicit destinations as `#page=N&view=...` (one-based) and
/// named ones as `#nameddest=<percent-encoded name>`. A bare `#name` is a
/// named destination too.
fn uri_action(uri: &str) -> OutlineAction {
    match uri.strip_prefix('#') {
        Some(fragment) => OutlineAction::GoTo(fragment_destination(fragment)),
        None if uri.starts_with("launch:") || uri.starts_with(FILE_SCHEME) => {
            OutlineAction::Launch(uri.to_string())
        }
        None => OutlineAction::Uri(uri.to_string()),
    }
}

fn fragment_destination(fragment: &str) -> Option<Destination> {
    let mut page = None;
    for param in fragment.split('&') {
        if let Some(name) = param.strip_prefix(NAMED_DEST_PREFIX) {
            return Some(Destination::Named(decode_name(name)));
        }
        if let Some(number) = param.strip_prefix(PAGE_PREFIX) {
            page = number.parse::<i32>().ok().map(|n| n - 1);
        }
    }
    match page {
        Some(page) => Some(Destination::Page(page)),
        None if fragment.is_empty() || fragment.contains('=') => None,
        None => Some(Destination::Named(decode_name(fragment))),
    }
}

fn decode_name(name: &str) -> String {
    percent_decode_str(name).decode_utf8_lossy().into_owned()
}

/// Named destinations come from the URI; any other go-to uses the resolved
/// location when MuPDF has one.
fn outline_action(uri: Option<&str>, dest_page: Option<i32>) -> Option<OutlineAction> {
    match (uri.map(uri_action), dest_page) {
        (Some(named @ OutlineAction::GoTo(Some(Destination::Named(_)))), _) => Some(named),
        (_, Some(page)) => Some(OutlineAction::GoTo(Some(Destination::Page(page)))),
        (action, None) => action,
    }
}

fn convert_outline(outline: &mupdf::Outline) -> OutlineNode {
    let dest_page = outline.dest.as_ref().map(|d| d.loc.page_number as i32);
    let title = Some(outline.title.clone()).filter(|t| !t.is_empty());
    OutlineNode {
        title,
        action: outline_action(outline.uri.as_deref(), dest_page),
        children: outline.down.iter().map(convert_outline).collect(),
    }
}

/// Composite a premultiplied RGBA pixmap over `dest` starting at column `dx`
fn composite_over(dest: &mut Pixmap, src: &Pixmap, dx: i64) {
    let src_n = src.n() as usize;
    if src_n != BYTES_PER_PIXEL {
        return;
    }

    let dest_width = dest.width() as i64;
    let dest_height = dest.height() as usize;
    let dest_stride = dest.stride() as usize;
    let src_width = src.width() as i64;
    let src_stride = src.stride() as usize;
    let rows = dest_height.min(src.height() as usize);

    let x_start = dx.max(0);
    let x_end = (dx + src_width).min(dest_width);
    if x_start >= x_end {
        return;
    }

    let src_samples = src.samples();
    let dest_samples = dest.samples_mut();
    for y in 0..rows {
        for x in x_start..x_end {
            let s = y * src_stride + (x - dx) as usize * BYTES_PER_PIXEL;
            let d = y * dest_stride + x as usize * BYTES_PER_PIXEL;
            let alpha = u16::from(src_samples[s + 3]);
            for c in 0..BYTES_PER_PIXEL {
                let under = u16::from(dest_samples[d + c]);
                let over = u16::from(src_samples[s + c]);
                dest_samples[d + c] = (over + under * (255 - alpha) / 255).min(255) as u8;
            }
        }
    }
}

impl PdfEngine for MupdfEngine {
    type Page = Page;
    type Surface = MupdfSurface;

    fn page_count(&self) -> Result<usize, PdfFault> {
        Ok(self.doc.page_count()?.max(0) as usize)
    }

    fn load_page(&self, index: usize) -> Result<Self::Page, PdfFault> {
        let page_count = self.page_count()?;
        if index >= page_count {
            return Err(PdfFault::PageIndexOutOfRange {
                page: index,
                page_count,
            });
        }
        self.doc
            .load_page(index as i32)
            .map_err(|e| PdfFault::PageLoad {
                page: index,
                detail: e.to_string(),
            })
    }

    fn page_size(&self, page: &Self::Page) -> Result<PageSize, PdfFault> {
        let bounds = page.bounds()?;
        Ok(PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
    }

    fn page_text(&self, page: &Self::Page) -> Result<Option<String>, PdfFault> {
        let text = page.to_text_page(TextPageFlags::empty())?.to_text()?;
        Ok(Some(text).filter(|t| !t.is_empty()))
    }

    fn search_page(&self, page: &Self::Page, query: &str) -> Result<Vec<MatchRect>, PdfFault> {
        let quads = page.search(query, self.search_hit_max)?;
        Ok(quads
            .into_iter()
            .map(|q| {
                MatchRect::new(
                    q.ul.x.min(q.ll.x),
                    q.ul.y.min(q.ur.y),
                    q.ur.x.max(q.lr.x),
                    q.ll.y.max(q.lr.y),
                )
            })
            .collect())
    }

    fn outline(&self) -> Result<Option<Vec<OutlineNode>>, PdfFault> {
        // MuPDF reports a missing outline and an empty one the same way
        let outlines = self.doc.outlines()?;
        if outlines.is_empty() {
            return Ok(None);
        }
        Ok(Some(outlines.iter().map(convert_outline).collect()))
    }

    fn find_destination(&self, name: &str) -> Option<Destination> {
        let encoded = utf8_percent_encode(name, URI_COMPONENT_SET);
        let uri = format!("#{NAMED_DEST_PREFIX}{encoded}");
        match self.doc.resolve_link(&uri) {
            Ok(Some(dest)) => Some(Destination::Page(dest.loc.page_number as i32)),
            Ok(None) => None,
            Err(e) => {
                debug!("Named destination {name:?} did not resolve: {e}");
                None
            }
        }
    }

    fn new_surface(&self, width: u32, height: u32) -> Result<Self::Surface, PdfFault> {
        let pixmap = Pixmap::new_with_w_h(
            &Colorspace::device_rgb(),
            width as i32,
            height as i32,
            true,
        )?;
        Ok(MupdfSurface { pixmap })
    }

    fn paint_page(
        &self,
        page: &Self::Page,
        surface: &mut Self::Surface,
        transform: &PageTransform,
    ) -> Result<(), PdfFault> {
        // Render unshifted; the horizontal shift is applied while compositing
        let [sx, _, _, sy, dx, _] = transform.coefficients();
        let content = page.to_pixmap(
            &Matrix::new_scale(sx, sy),
            &Colorspace::device_rgb(),
            true,
            false,
        )?;
        composite_over(&mut surface.pixmap, &content, dx.round() as i64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_uris_become_named_destinations() {
        assert!(matches!(
            uri_action("#nameddest=intro"),
            OutlineAction::GoTo(Some(Destination::Named(ref n))) if n == "intro"
        ));
        assert!(matches!(
            uri_action("#chapter.2"),
            OutlineAction::GoTo(Some(Destination::Named(ref n))) if n == "chapter.2"
        ));
        assert!(matches!(
            uri_action("https://example.com"),
            OutlineAction::Uri(_)
        ));
        assert!(matches!(
            uri_action("file:///tmp/other.pdf"),
            OutlineAction::Launch(_)
        ));
    }

    #[test]
    fn explicit_destinations_use_the_page() {
        assert!(matches!(
            uri_action("#page=2&view=Fit"),
            OutlineAction::GoTo(Some(Destination::Page(1)))
        ));
        assert!(matches!(
            outline_action(Some("#page=2&view=Fit"), Some(1)),
            Some(OutlineAction::GoTo(Some(Destination::Page(1))))
        ));
        assert!(matches!(
            outline_action(Some("#view=FitH,120"), Some(6)),
            Some(OutlineAction::GoTo(Some(Destination::Page(6))))
        ));
        assert!(matches!(
            outline_action(None, Some(0)),
            Some(OutlineAction::GoTo(Some(Destination::Page(0))))
        ));
        assert!(outline_action(None, None).is_none());
    }

    #[test]
    fn named_uri_wins_over_resolved_location() {
        assert!(matches!(
            outline_action(Some("#nameddest=chapter.1"), Some(3)),
            Some(OutlineAction::GoTo(Some(Destination::Named(ref n)))) if n == "chapter.1"
        ));
        assert!(matches!(
            outline_action(Some("https://example.com"), None),
            Some(OutlineAction::Uri(_))
        ));
    }

    #[test]
    fn escaped_names_are_decoded() {
        assert!(matches!(
            uri_action("#nameddest=sec%3Aintro"),
            OutlineAction::GoTo(Some(Destination::Named(ref n))) if n == "sec:intro"
        ));
        assert_eq!(
            utf8_percent_encode("sec:intro", URI_COMPONENT_SET).to_string(),
            "sec%3Aintro"
        );
        assert_eq!(
            utf8_percent_encode("chapter.1_(a)", URI_COMPONENT_SET).to_string(),
            "chapter.1_(a)"
        );
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = MupdfEngine::open("file:///definitely/not/here.pdf")
            .err()
            .expect("open should fail");
        match err {
            PdfFault::Open { path, .. } => assert_eq!(path, "/definitely/not/here.pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
