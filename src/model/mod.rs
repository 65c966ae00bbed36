//! Canonical AST produced by the normalizer.
//!
//! This is the story-first intermediate tree consumed by the target-format
//! emitter. All lengths are integers in the target's fixed-point unit
//! (100 units per point). The tree is fully self-contained: inline text
//! frames own their nested paragraphs outright and style inheritance has
//! already been resolved.

mod document;
mod json;
mod paragraph;
mod section;
mod style;
mod table;

pub use document::{Document, FontDef, Metadata, PageBackground};
pub use json::{from_json, to_json, JsonFormat};
pub use paragraph::{
    Break, InlineItem, InlineObject, InlineObjectKind, Paragraph, TextRun,
};
pub use section::{Block, Figure, FigureKind, PageLayout, Section, TextFrameBlock};
pub use style::StyleDef;
pub use table::{CellBorder, Table, TableCell, TableRow};
