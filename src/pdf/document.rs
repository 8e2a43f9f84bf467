//! Owned document handle tying the pipeline stages to one engine

use super::engine::PdfEngine;
use super::error::PdfFault;
use super::parsing::toc::{self, OutlineOptions};
use super::raster::{self, RasterOptions, RasterRequest};
use super::search;
use super::types::{MatchRect, TocEntry};
use crate::text_buffer::DEFAULT_CHUNK_SIZE;

/// Per-document knobs shared by every operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentOptions {
    pub raster: RasterOptions,
    pub outline: OutlineOptions,
    /// Growth increment for serialized search hits
    pub text_chunk_size: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            raster: RasterOptions::default(),
            outline: OutlineOptions::default(),
            text_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A parsed document. Dropping it releases every engine resource.
pub struct PdfDocument<E: PdfEngine> {
    engine: E,
    options: DocumentOptions,
}

#[cfg(feature = "pdf")]
impl PdfDocument<super::mupdf_engine::MupdfEngine> {
    /// Open a file through MuPDF; `file://` URIs are accepted
    pub fn open(path: &str) -> Result<Self, PdfFault> {
        let engine = super::mupdf_engine::MupdfEngine::open(path)?;
        Ok(Self::from_engine(engine))
    }
}

impl<E: PdfEngine> PdfDocument<E> {
    pub fn from_engine(engine: E) -> Self {
        Self {
            engine,
            options: DocumentOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DocumentOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn page_count(&self) -> Result<usize, PdfFault> {
        self.engine.page_count()
    }

    /// Rasterize `page` into a tightly packed RGBA buffer of
    /// `width * height * 4` bytes. Returns the rendered height.
    pub fn render_page(
        &self,
        page: usize,
        output: &mut [u8],
        width: u32,
        height: u32,
        x_offset: f32,
    ) -> Result<u32, PdfFault> {
        let request = RasterRequest {
            page,
            width,
            height,
            x_offset,
        };
        raster::render_page(&self.engine, &request, &self.options.raster, output)
    }

    /// Flattened outline text, one indented line per go-to bookmark
    pub fn toc(&self) -> Result<String, PdfFault> {
        toc::flatten_outline(&self.engine, &self.options.outline)
    }

    pub fn outline_entries(&self) -> Result<Vec<TocEntry>, PdfFault> {
        toc::extract_toc(&self.engine)
    }

    pub fn page_text(&self, page: usize) -> Result<String, PdfFault> {
        search::extract_page_text(&self.engine, page)
    }

    /// Serialized match rectangles for `query` on `page`
    pub fn text_selection(&self, page: usize, query: &str) -> Result<String, PdfFault> {
        search::find_text_rectangles(&self.engine, page, query, self.options.text_chunk_size)
    }

    pub fn match_rects(&self, page: usize, query: &str) -> Result<Vec<MatchRect>, PdfFault> {
        search::find_match_rects(&self.engine, page, query)
    }
}
