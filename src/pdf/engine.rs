//! Boundary to the document/rendering library
//!
//! Everything the rasterizer, outline flattener and text extractor need from
//! the underlying engine goes through these two traits. Pages and surfaces are
//! owned values released on drop, so every exit path gives them back.

use super::error::PdfFault;
use super::types::{Destination, MatchRect, OutlineNode, PageSize, Rgba};
use super::zoom::PageTransform;

/// Bytes per pixel of every raster surface
pub const BYTES_PER_PIXEL: usize = 4;

/// Fixed-format 32-bit raster the engine paints into
pub trait RasterSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Byte length of one pixel row, padding included
    fn stride(&self) -> usize;
    /// Paint every pixel with a solid color
    fn fill(&mut self, color: Rgba);
    /// Raw pixel bytes, `stride * height` long
    fn samples(&self) -> &[u8];
}

/// Capabilities required from a parsed document
pub trait PdfEngine {
    type Page;
    type Surface: RasterSurface;

    fn page_count(&self) -> Result<usize, PdfFault>;

    /// Load a page by zero-based index
    fn load_page(&self, index: usize) -> Result<Self::Page, PdfFault>;

    fn page_size(&self, page: &Self::Page) -> Result<PageSize, PdfFault>;

    /// Raw page text, `None` when the engine has nothing for the page
    fn page_text(&self, page: &Self::Page) -> Result<Option<String>, PdfFault>;

    /// Rectangles of every occurrence of `query`, in engine order
    fn search_page(&self, page: &Self::Page, query: &str) -> Result<Vec<MatchRect>, PdfFault>;

    /// Bookmark tree, `None` when the document carries no outline at all
    fn outline(&self) -> Result<Option<Vec<OutlineNode>>, PdfFault>;

    /// Look a name up in the document's named-destination table
    fn find_destination(&self, name: &str) -> Option<Destination>;

    /// Allocate a `width x height` RGBA surface
    fn new_surface(&self, width: u32, height: u32) -> Result<Self::Surface, PdfFault>;

    /// Paint page content onto `surface` through `transform`
    fn paint_page(
        &self,
        page: &Self::Page,
        surface: &mut Self::Surface,
        transform: &PageTransform,
    ) -> Result<(), PdfFault>;
}
