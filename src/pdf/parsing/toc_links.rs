//! Navigation links parsed back out of flattened outline text
//!
//! Only named-destination lines (`<indent>- <title><name>@<page>`) carry a
//! page a viewer can jump to; everything else is ignored. LaTeX-generated
//! anchor names (`section*.3`, `chapter.2`, ...) are glued to the title in
//! the flattened text, so they are stripped from the label.

use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:appendix|section|subsection|subsubsection|chapter)\*?\d*(?:\.\d*[A-Za-z]*)*$",
    )
    .expect("anchor suffix pattern is valid")
});

/// One jump target of the table of contents
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocLink {
    /// Line text before the `@`, anchor suffix removed
    pub label: String,
    /// Raw target text after the `@`
    pub target: String,
}

impl TocLink {
    /// Target as a page number, if it is one
    pub fn page(&self) -> Option<i32> {
        self.target.trim().parse().ok()
    }
}

/// Collect every `label@target` line of a flattened outline
pub fn parse_toc_links(toc: &str) -> Vec<TocLink> {
    toc.split('\n')
        .filter_map(|line| {
            let mut parts = line.split('@');
            let label = parts.next()?;
            let target = parts.next()?;
            Some(TocLink {
                label: ANCHOR_SUFFIX.replace(label, "").into_owned(),
                target: target.to_string(),
            })
        })
        .collect()
}

/// True when the outline text has at least one jumpable entry
pub fn has_links(toc: &str) -> bool {
    toc.contains('@')
}
