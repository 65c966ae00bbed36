//! Paragraph and inline-item AST types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A paragraph: resolved style reference, local overrides, inline items.
///
/// Length overrides are in fixed units; `None` means "inherit from the
/// referenced style".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph style reference (namespace prefix stripped)
    pub style_ref: Option<String>,

    /// Alignment override (LeftAlign, CenterAlign, RightAlign, *Justified)
    pub alignment: Option<String>,

    /// First-line indent override
    pub first_line_indent: Option<i64>,

    /// Left margin override
    pub left_margin: Option<i64>,

    /// Right margin override
    pub right_margin: Option<i64>,

    /// Space before override
    pub space_before: Option<i64>,

    /// Space after override
    pub space_after: Option<i64>,

    /// Whether paragraph shading is on
    pub shading_on: bool,

    /// Shading color (`#RRGGBB`)
    pub shading_color: Option<String>,

    /// Shading tint 0..=100
    pub shading_tint: Option<f64>,

    /// Inline items in order
    pub items: Vec<InlineItem>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inline item.
    pub fn add_item(&mut self, item: InlineItem) {
        self.items.push(item);
    }

    /// Drop trailing break items.
    pub fn trim_trailing_breaks(&mut self) {
        while matches!(self.items.last(), Some(InlineItem::Break(_))) {
            self.items.pop();
        }
    }

    /// Check if the paragraph has no inline items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .map(|item| match item {
                InlineItem::Text(run) => run.text.clone(),
                InlineItem::Break(_) => "\n".to_string(),
                InlineItem::Object(obj) => obj.plain_text(),
            })
            .collect()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineItem {
    /// A text run with resolved styling
    Text(TextRun),

    /// An anchored inline object (collapsed leaf)
    Object(InlineObject),

    /// A forced break
    Break(Break),
}

/// A forced break within text flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Break {
    /// Line break
    Line,
    /// Column break
    Column,
    /// Page break
    Page,
}

/// A run of text with fully resolved styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRun {
    /// Character style reference (namespace prefix stripped)
    pub character_style_ref: Option<String>,

    /// The text content
    pub text: String,

    /// Resolved font family
    pub font_family: Option<String>,

    /// Resolved font style (Bold, Italic, ...)
    pub font_style: Option<String>,

    /// Resolved font size (fixed units)
    pub font_size: Option<i64>,

    /// Resolved text color (`#RRGGBB`)
    pub color: Option<String>,

    /// Letter spacing in percent
    pub letter_spacing: Option<i16>,

    /// Subscript flag
    pub subscript: bool,

    /// Superscript flag
    pub superscript: bool,
}

impl TextRun {
    /// Create a text run with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// The collapse strategy that produced an inline object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineObjectKind {
    /// Extracted raster image
    Image,
    /// Group or vector rasterized by the rendering collaborator
    RenderedGroup,
    /// Inline text frame collapsed to a nested mini-document
    InlineTextFrame,
}

/// An anchored inline object, collapsed to a leaf.
///
/// For `InlineTextFrame` the object owns its nested paragraphs and tables
/// outright; there is no back-reference to the pool entry that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineObject {
    /// Object kind
    pub kind: InlineObjectKind,

    /// Source object id
    pub source_id: String,

    /// Display width (fixed units)
    pub width: i64,

    /// Display height (fixed units)
    pub height: i64,

    /// Raster payload for `Image`
    #[serde(skip_serializing, default)]
    pub image_data: Vec<u8>,

    /// Raster format (e.g. `png`, `jpeg`)
    pub image_format: Option<String>,

    /// Raster width in pixels
    pub pixel_width: u32,

    /// Raster height in pixels
    pub pixel_height: u32,

    /// Nested paragraphs for `InlineTextFrame`
    pub paragraphs: Vec<Paragraph>,

    /// Nested tables for `InlineTextFrame`
    pub tables: Vec<Table>,
}

impl InlineObject {
    /// Create an empty object of the given kind.
    pub fn new(kind: InlineObjectKind, source_id: impl Into<String>) -> Self {
        Self {
            kind,
            source_id: source_id.into(),
            width: 0,
            height: 0,
            image_data: Vec::new(),
            image_format: None,
            pixel_width: 0,
            pixel_height: 0,
            paragraphs: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Get plain text of a nested mini-document.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::new();
        p.add_item(InlineItem::Text(TextRun::new("Hello ")));
        p.add_item(InlineItem::Text(TextRun::new("world")));
        assert_eq!(p.plain_text(), "Hello world");
    }

    #[test]
    fn test_trim_trailing_breaks() {
        let mut p = Paragraph::new();
        p.add_item(InlineItem::Text(TextRun::new("line")));
        p.add_item(InlineItem::Break(Break::Line));
        p.add_item(InlineItem::Break(Break::Line));

        p.trim_trailing_breaks();
        assert_eq!(p.items.len(), 1);
    }

    #[test]
    fn test_inline_object_nested_text() {
        let mut obj = InlineObject::new(InlineObjectKind::InlineTextFrame, "u1");
        let mut para = Paragraph::new();
        para.add_item(InlineItem::Text(TextRun::new("nested")));
        obj.paragraphs.push(para);

        assert_eq!(obj.plain_text(), "nested");
    }
}
