//! Zoom-to-fit computation for page rasterization
//!
//! Only the page width drives the zoom factor: the page plus a symmetric
//! horizontal inset is stretched across the target width, and whatever the
//! page does not cover vertically stays background.

use super::error::PdfFault;

/// Pages narrower than this are treated as degenerate
pub const MIN_PAGE_WIDTH: f32 = 1.0;

/// Scale factor that fits `page_width` plus `x_offset` on both sides into
/// `target_width` pixels.
///
/// Negative offsets crop the page margins instead of adding an inset.
pub fn compute_fit(page_width: f32, target_width: u32, x_offset: f32) -> Result<f32, PdfFault> {
    if !(page_width >= MIN_PAGE_WIDTH) {
        return Err(PdfFault::DegeneratePageGeometry { width: page_width });
    }

    let span = 2.0 * x_offset + page_width;
    if !(span > 0.0) || !span.is_finite() {
        return Err(PdfFault::DegeneratePageGeometry { width: span });
    }

    Ok(target_width as f32 / span)
}

/// Uniform scale followed by a horizontal shift expressed in page units.
///
/// A page point `(x, y)` lands on `(scale * (x + x_offset), scale * y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageTransform {
    pub scale: f32,
    pub x_offset: f32,
}

impl PageTransform {
    #[must_use]
    pub const fn new(scale: f32, x_offset: f32) -> Self {
        Self { scale, x_offset }
    }

    /// Fit transform for a page of `page_width` into `target_width` pixels
    pub fn fit(page_width: f32, target_width: u32, x_offset: f32) -> Result<Self, PdfFault> {
        let scale = compute_fit(page_width, target_width, x_offset)?;
        Ok(Self { scale, x_offset })
    }

    /// Map a page-space point to surface pixels
    #[must_use]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.scale * (x + self.x_offset), self.scale * y)
    }

    /// Row-major affine coefficients `[a, b, c, d, e, f]`
    #[must_use]
    pub fn coefficients(&self) -> [f32; 6] {
        [
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.scale * self.x_offset,
            0.0,
        ]
    }
}
