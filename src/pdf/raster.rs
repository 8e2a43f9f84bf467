//! Page rasterizer - fills a caller-owned RGBA buffer

use log::{debug, warn};

use super::engine::{BYTES_PER_PIXEL, PdfEngine, RasterSurface};
use super::error::PdfFault;
use super::types::Rgba;
use super::zoom::PageTransform;

/// Rasterization parameters that do not change per call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterOptions {
    /// Color painted under the page before content is drawn
    pub background: Rgba,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            background: Rgba::MINT,
        }
    }
}

/// A single page rasterization request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterRequest {
    /// Zero-based page index
    pub page: usize,
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Horizontal inset in page units, counted on both sides
    pub x_offset: f32,
}

impl RasterRequest {
    /// Bytes the caller's buffer must hold
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

/// Render one page into `output` (tightly packed, `width * 4` bytes per row).
///
/// Returns the rendered height. `output` is only written once the whole
/// page has been painted and the surface layout checked.
pub fn render_page<E: PdfEngine>(
    engine: &E,
    request: &RasterRequest,
    options: &RasterOptions,
    output: &mut [u8],
) -> Result<u32, PdfFault> {
    if request.width == 0 || request.height == 0 {
        return Err(PdfFault::InvalidDimensions {
            width: request.width,
            height: request.height,
        });
    }

    let expected = request.buffer_len();
    if output.len() != expected {
        return Err(PdfFault::OutputBufferSize {
            len: output.len(),
            expected,
        });
    }

    let page_count = engine.page_count()?;
    if request.page >= page_count {
        warn!(
            "Page number {} out of range (0-{})",
            request.page,
            page_count.saturating_sub(1)
        );
        return Err(PdfFault::PageIndexOutOfRange {
            page: request.page,
            page_count,
        });
    }

    let page = engine.load_page(request.page)?;
    let size = engine.page_size(&page)?;
    let transform = PageTransform::fit(size.width, request.width, request.x_offset)?;
    debug!(
        "Page {} ({}x{}): zoom factor = {:.6}",
        request.page, size.width, size.height, transform.scale
    );

    let mut surface = engine.new_surface(request.width, request.height)?;
    surface.fill(options.background);
    engine.paint_page(&page, &mut surface, &transform)?;

    copy_packed(&surface, output)?;
    Ok(request.height)
}

/// Copy surface pixels into `output`, refusing padded rows
fn copy_packed<S: RasterSurface>(surface: &S, output: &mut [u8]) -> Result<(), PdfFault> {
    let expected = surface.width() as usize * BYTES_PER_PIXEL;
    let stride = surface.stride();
    if stride != expected {
        warn!("Unexpected stride {stride}, expected {expected}");
        return Err(PdfFault::StrideMismatch { stride, expected });
    }

    let samples = surface.samples();
    if samples.len() < output.len() {
        return Err(PdfFault::generic(format!(
            "Surface holds {} bytes, need {}",
            samples.len(),
            output.len()
        )));
    }

    output.copy_from_slice(&samples[..output.len()]);
    Ok(())
}
