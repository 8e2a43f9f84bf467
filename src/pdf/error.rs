//! Error taxonomy for document operations

use crate::text_buffer::TextBufferError;

/// Errors from opening, rendering or querying a document
#[derive(Debug, thiserror::Error)]
pub enum PdfFault {
    #[error("failed to open {path}: {detail}")]
    Open { path: String, detail: String },

    #[error("page number {page} out of range (0-{})", .page_count.saturating_sub(1))]
    PageIndexOutOfRange { page: usize, page_count: usize },

    #[error("could not load page {page}: {detail}")]
    PageLoad { page: usize, detail: String },

    #[error("page width {width} is too small to render")]
    DegeneratePageGeometry { width: f32 },

    #[error("unexpected surface stride {stride} (expected {expected})")]
    StrideMismatch { stride: usize, expected: usize },

    #[error("output buffer holds {len} bytes, expected {expected}")]
    OutputBufferSize { len: usize, expected: usize },

    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("search query is empty")]
    EmptyQuery,

    #[error("document has no outline")]
    NoOutlineAvailable,

    #[error("no text found on page {page}")]
    NoTextOnPage { page: usize },

    #[error("no matches on page {page}")]
    NoSearchMatches { page: usize },

    #[error("text buffer: {0}")]
    Text(#[from] TextBufferError),

    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Engine(#[from] mupdf::error::Error),

    #[error("{detail}")]
    Generic { detail: String },
}

impl PdfFault {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }

    /// True for failures caused by allocation during result assembly
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Text(TextBufferError::Allocation { .. }))
    }
}
