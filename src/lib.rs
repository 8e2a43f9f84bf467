// Export modules for use in tests
pub mod pdf;
pub mod settings;
pub mod text_buffer;
pub mod viewport;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use pdf::{PdfDocument, PdfEngine, PdfFault};
pub use text_buffer::ChunkedText;
