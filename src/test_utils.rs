//! In-memory engine for exercising the pipeline without MuPDF

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::pdf::engine::{BYTES_PER_PIXEL, PdfEngine, RasterSurface};
use crate::pdf::error::PdfFault;
use crate::pdf::{Destination, MatchRect, OutlineNode, PageSize, PageTransform, Rgba};

/// Color the fake engine paints where page content lands
pub const INK: Rgba = Rgba([20, 20, 20, 255]);

/// Description of one fake page
#[derive(Clone, Debug)]
pub struct FakePage {
    size: PageSize,
    text: Option<String>,
    matches: HashMap<String, Vec<MatchRect>>,
    failing_queries: Vec<String>,
    loadable: bool,
    blank: bool,
}

impl FakePage {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            size: PageSize::new(width, height),
            text: None,
            matches: HashMap::new(),
            failing_queries: Vec::new(),
            loadable: true,
            blank: false,
        }
    }

    /// US letter page
    pub fn letter() -> Self {
        Self::sized(612.0, 792.0)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_matches(mut self, query: impl Into<String>, rects: Vec<MatchRect>) -> Self {
        self.matches.insert(query.into(), rects);
        self
    }

    /// Searching for `query` makes the engine report an error
    pub fn with_failing_query(mut self, query: impl Into<String>) -> Self {
        self.failing_queries.push(query.into());
        self
    }

    /// Loading this page fails
    pub fn unloadable(mut self) -> Self {
        self.loadable = false;
        self
    }

    /// Painting leaves the surface untouched
    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }
}

/// Page handle that reports its release to the owning engine
#[derive(Debug)]
pub struct FakePageHandle {
    index: usize,
    live: Rc<Cell<usize>>,
}

impl Drop for FakePageHandle {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// RGBA surface with optional row padding
#[derive(Debug)]
pub struct FakeSurface {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
    live: Rc<Cell<usize>>,
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl FakeSurface {
    fn put(&mut self, x: usize, y: usize, color: Rgba) {
        let offset = y * self.stride + x * BYTES_PER_PIXEL;
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.0);
    }
}

impl RasterSurface for FakeSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn fill(&mut self, color: Rgba) {
        for row in self.data.chunks_exact_mut(self.stride) {
            for px in row[..self.width as usize * BYTES_PER_PIXEL].chunks_exact_mut(BYTES_PER_PIXEL)
            {
                px.copy_from_slice(&color.0);
            }
        }
    }

    fn samples(&self) -> &[u8] {
        &self.data
    }
}

/// Scriptable in-memory document
#[derive(Debug, Default)]
pub struct FakeEngine {
    pages: Vec<FakePage>,
    outline: Option<Vec<OutlineNode>>,
    destinations: HashMap<String, Destination>,
    row_padding: usize,
    live_pages: Rc<Cell<usize>>,
    live_surfaces: Rc<Cell<usize>>,
    painted: RefCell<Vec<PageTransform>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: FakePage) -> Self {
        self.pages.push(page);
        self
    }

    pub fn with_pages(mut self, count: usize, page: FakePage) -> Self {
        self.pages.extend(std::iter::repeat_n(page, count));
        self
    }

    pub fn with_outline(mut self, outline: Vec<OutlineNode>) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn with_destination(mut self, name: impl Into<String>, dest: Destination) -> Self {
        self.destinations.insert(name.into(), dest);
        self
    }

    /// Extra bytes appended to every surface row
    pub fn with_row_padding(mut self, padding: usize) -> Self {
        self.row_padding = padding;
        self
    }

    /// Pages loaded and not yet released
    pub fn live_pages(&self) -> usize {
        self.live_pages.get()
    }

    /// Surfaces allocated and not yet released
    pub fn live_surfaces(&self) -> usize {
        self.live_surfaces.get()
    }

    /// Transforms passed to `paint_page`, in call order
    pub fn painted_transforms(&self) -> Vec<PageTransform> {
        self.painted.borrow().clone()
    }

    fn page(&self, handle: &FakePageHandle) -> &FakePage {
        &self.pages[handle.index]
    }
}

impl PdfEngine for FakeEngine {
    type Page = FakePageHandle;
    type Surface = FakeSurface;

    fn page_count(&self) -> Result<usize, PdfFault> {
        Ok(self.pages.len())
    }

    fn load_page(&self, index: usize) -> Result<Self::Page, PdfFault> {
        let Some(page) = self.pages.get(index) else {
            return Err(PdfFault::PageIndexOutOfRange {
                page: index,
                page_count: self.pages.len(),
            });
        };
        if !page.loadable {
            return Err(PdfFault::PageLoad {
                page: index,
                detail: "damaged page tree".to_string(),
            });
        }

        self.live_pages.set(self.live_pages.get() + 1);
        Ok(FakePageHandle {
            index,
            live: Rc::clone(&self.live_pages),
        })
    }

    fn page_size(&self, page: &Self::Page) -> Result<PageSize, PdfFault> {
        Ok(self.page(page).size)
    }

    fn page_text(&self, page: &Self::Page) -> Result<Option<String>, PdfFault> {
        Ok(self.page(page).text.clone())
    }

    fn search_page(&self, page: &Self::Page, query: &str) -> Result<Vec<MatchRect>, PdfFault> {
        let page = self.page(page);
        if page.failing_queries.iter().any(|q| q == query) {
            return Err(PdfFault::generic(format!("search for {query:?} failed")));
        }
        Ok(page.matches.get(query).cloned().unwrap_or_default())
    }

    fn outline(&self) -> Result<Option<Vec<OutlineNode>>, PdfFault> {
        Ok(self.outline.clone())
    }

    fn find_destination(&self, name: &str) -> Option<Destination> {
        self.destinations.get(name).cloned()
    }

    fn new_surface(&self, width: u32, height: u32) -> Result<Self::Surface, PdfFault> {
        let stride = width as usize * BYTES_PER_PIXEL + self.row_padding;
        self.live_surfaces.set(self.live_surfaces.get() + 1);
        Ok(FakeSurface {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
            live: Rc::clone(&self.live_surfaces),
        })
    }

    fn paint_page(
        &self,
        page: &Self::Page,
        surface: &mut Self::Surface,
        transform: &PageTransform,
    ) -> Result<(), PdfFault> {
        self.painted.borrow_mut().push(*transform);
        let page = self.page(page);
        if page.blank {
            return Ok(());
        }

        let (x0, _) = transform.apply(0.0, 0.0);
        let (x1, y1) = transform.apply(page.size.width, page.size.height);
        let x0 = x0.max(0.0) as usize;
        let x1 = (x1.max(0.0) as usize).min(surface.width as usize);
        let y1 = (y1.max(0.0) as usize).min(surface.height as usize);

        for y in 0..y1 {
            for x in x0..x1 {
                surface.put(x, y, INK);
            }
        }
        Ok(())
    }
}
