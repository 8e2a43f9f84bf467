//! Continuous-scroll page strip
//!
//! Pages are laid out top to bottom at a fixed rendered height with a gap
//! between them. The scroll position is a page index plus a row offset into
//! that page; stepping past either edge rolls over into the neighbour.

use log::warn;

use crate::pdf::{BYTES_PER_PIXEL, PdfDocument, PdfEngine, PdfFault, Rgba};

/// Aspect used when the configured one is unusable
pub const FALLBACK_ASPECT_PERCENT: u32 = 80;

/// Scroll direction for stepping
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Window and page-strip dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewerGeometry {
    pub window_width: u32,
    pub window_height: u32,
    /// Rendered height of every page
    pub page_height: u32,
    pub page_gap: u32,
}

impl ViewerGeometry {
    /// Derive the page height from the width and a width/height percentage
    pub fn new(window_width: u32, window_height: u32, aspect_percent: u32, page_gap: u32) -> Self {
        let aspect = if aspect_percent < 1 {
            FALLBACK_ASPECT_PERCENT
        } else {
            aspect_percent
        };
        let page_height = (f64::from(window_width) * 100.0 / f64::from(aspect)) as u32;
        Self {
            window_width,
            window_height,
            page_height,
            page_gap,
        }
    }
}

/// One horizontal band of the window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slice {
    /// Rows `src_row..src_row + rows` of rendered `page`, drawn at `dest_row`
    Page {
        page: usize,
        src_row: u32,
        dest_row: u32,
        rows: u32,
    },
    /// Blank separator band
    Gap { dest_row: u32, rows: u32 },
}

/// Top-of-window position inside the strip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollPosition {
    pub page: usize,
    /// Rows of `page` scrolled above the window top
    pub top: u32,
}

impl ScrollPosition {
    pub fn new(page: usize, top: u32) -> Self {
        Self { page, top }
    }

    /// Move by `delta` rows, rolling over page boundaries.
    ///
    /// Scrolling above the first page stops at its top.
    pub fn advance(&mut self, delta: i64, page_height: u32) {
        if page_height == 0 {
            return;
        }
        let page_height = i64::from(page_height);
        let mut page = self.page as i64;
        let mut top = i64::from(self.top) + delta;

        while top > page_height {
            page += 1;
            top -= page_height;
        }
        while top < 0 {
            page -= 1;
            top += page_height;
        }

        if page < 0 {
            self.page = 0;
            self.top = 0;
        } else {
            self.page = page as usize;
            self.top = top as u32;
        }
    }

    /// Step by `multiplier` scroll steps
    pub fn scroll(
        &mut self,
        direction: ScrollDirection,
        step: u32,
        multiplier: u32,
        page_height: u32,
    ) {
        let delta = i64::from(step) * i64::from(multiplier);
        match direction {
            ScrollDirection::Up => self.advance(-delta, page_height),
            ScrollDirection::Down => self.advance(delta, page_height),
        }
    }

    /// Put the top of `page` at the top of the window
    pub fn jump_to(&mut self, page: usize) {
        self.page = page;
        self.top = 0;
    }

    /// Keep the position on an existing page
    pub fn clamp_to(&mut self, page_count: usize) {
        if page_count == 0 {
            *self = Self::default();
        } else if self.page >= page_count {
            self.page = page_count - 1;
            self.top = 0;
        }
    }
}

/// Bands to draw for the current position, top to bottom.
///
/// Covers the current page and, when it ends inside the window, the gap
/// and the following page.
pub fn visible_slices(geometry: &ViewerGeometry, position: &ScrollPosition) -> Vec<Slice> {
    let ViewerGeometry {
        window_height,
        page_height,
        page_gap,
        ..
    } = *geometry;
    let mut slices = Vec::with_capacity(3);
    let top = position.top.min(page_height);

    let current_rows = (page_height - top).min(window_height);
    if current_rows > 0 {
        slices.push(Slice::Page {
            page: position.page,
            src_row: top,
            dest_row: 0,
            rows: current_rows,
        });
    }

    let gap_row = page_height - top;
    if gap_row + page_gap >= window_height {
        if gap_row < window_height && page_gap > 0 {
            slices.push(Slice::Gap {
                dest_row: gap_row,
                rows: window_height - gap_row,
            });
        }
        return slices;
    }

    if page_gap > 0 {
        slices.push(Slice::Gap {
            dest_row: gap_row,
            rows: page_gap,
        });
    }
    let next_row = gap_row + page_gap;
    slices.push(Slice::Page {
        page: position.page + 1,
        src_row: 0,
        dest_row: next_row,
        rows: page_height.min(window_height - next_row),
    });
    slices
}

/// Compose the window at `position` into one `window_width * window_height`
/// RGBA buffer.
///
/// Gaps, pages past the end and pages that fail to render keep `gap_color`.
pub fn compose_window<E: PdfEngine>(
    doc: &PdfDocument<E>,
    geometry: &ViewerGeometry,
    position: &ScrollPosition,
    x_offset: f32,
    gap_color: Rgba,
) -> Result<Vec<u8>, PdfFault> {
    let page_count = doc.page_count()?;
    let row_bytes = geometry.window_width as usize * BYTES_PER_PIXEL;
    let pixel_count = geometry.window_width as usize * geometry.window_height as usize;
    let mut window = gap_color.0.repeat(pixel_count);
    let mut page_pixels = vec![0u8; row_bytes * geometry.page_height as usize];

    for slice in visible_slices(geometry, position) {
        let Slice::Page {
            page,
            src_row,
            dest_row,
            rows,
        } = slice
        else {
            continue;
        };
        if page >= page_count {
            continue;
        }

        if let Err(e) = doc.render_page(
            page,
            &mut page_pixels,
            geometry.window_width,
            geometry.page_height,
            x_offset,
        ) {
            warn!("Leaving page {page} blank: {e}");
            continue;
        }

        let src = src_row as usize * row_bytes;
        let dest = dest_row as usize * row_bytes;
        let len = rows as usize * row_bytes;
        window[dest..dest + len].copy_from_slice(&page_pixels[src..src + len]);
    }
    Ok(window)
}
