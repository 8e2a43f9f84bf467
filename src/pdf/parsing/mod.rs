pub mod toc;
pub mod toc_links;
