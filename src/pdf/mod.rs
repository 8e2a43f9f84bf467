//! PDF rendering and extraction

pub mod boundary;
pub mod document;
pub mod engine;
pub mod error;
#[cfg(feature = "pdf")]
pub mod mupdf_engine;
pub mod parsing;
pub mod raster;
pub mod search;
mod types;
mod zoom;

pub use document::{DocumentOptions, PdfDocument};
pub use engine::{BYTES_PER_PIXEL, PdfEngine, RasterSurface};
pub use error::PdfFault;
#[cfg(feature = "pdf")]
pub use mupdf_engine::{MupdfEngine, MupdfSurface};
pub use parsing::toc::OutlineOptions;
pub use raster::{RasterOptions, RasterRequest};
pub use types::*;
pub use zoom::*;
