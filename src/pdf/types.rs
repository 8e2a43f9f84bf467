//! Core types shared by the rasterizer, outline flattener and text search

/// Page dimensions in page units (points)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Straight RGBA color, one byte per channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Light mint painted under every page
    pub const MINT: Self = Self([228, 255, 235, 255]);

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::MINT
    }
}

/// Where a go-to outline entry points
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Explicit page number, in the engine's own numbering
    Page(i32),
    /// Name to be looked up in the document's named-destination table
    Named(String),
}

/// Action attached to an outline entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutlineAction {
    /// Jump inside the document; the destination may be missing
    GoTo(Option<Destination>),
    /// External link
    Uri(String),
    /// Launch an external application or file
    Launch(String),
}

/// One node of the bookmark tree as reported by the engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: Option<String>,
    /// `None` when the entry carries no action at all
    pub action: Option<OutlineAction>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Go-to node pointing at a page
    pub fn page(title: impl Into<String>, page: i32) -> Self {
        Self {
            title: Some(title.into()),
            action: Some(OutlineAction::GoTo(Some(Destination::Page(page)))),
            children: Vec::new(),
        }
    }

    /// Go-to node pointing at a named destination
    pub fn named(title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            action: Some(OutlineAction::GoTo(Some(Destination::Named(name.into())))),
            children: Vec::new(),
        }
    }

    /// External-link node
    pub fn uri(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            action: Some(OutlineAction::Uri(uri.into())),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = children;
        self
    }
}

/// Resolved page for a flattened outline entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TocTarget {
    /// Direct page reference (engine numbering)
    Page(i32),
    /// Named destination and the page it resolved to (-1 when unresolved)
    Named { name: String, page: i32 },
    /// Go-to entry without a destination
    Unspecified,
}

/// A single flattened entry of the table of contents
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Display title
    pub title: String,
    /// Nesting level (0 = top level)
    pub level: usize,
    /// Navigation target
    pub target: TocTarget,
}

/// Bounding box of one search hit in page coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl MatchRect {
    #[must_use]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Coordinates truncated toward zero
    #[must_use]
    pub fn truncated(&self) -> [i32; 4] {
        [
            self.x1 as i32,
            self.y1 as i32,
            self.x2 as i32,
            self.y2 as i32,
        ]
    }
}
