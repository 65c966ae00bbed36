//! Section (page) level AST types.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A section: one output page with its layout and content blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Page layout
    pub layout: PageLayout,

    /// Content blocks in paint order
    pub blocks: Vec<Block>,
}

impl Section {
    /// Create a section for a page number.
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            ..Default::default()
        }
    }

    /// Add a block.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the section has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the section.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::TextFrame(tf) => Some(tf.plain_text()),
                Block::Table(t) => Some(t.plain_text()),
                Block::Figure(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Page geometry: size, margins, and layout columns (fixed units).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page width
    pub page_width: i64,
    /// Page height
    pub page_height: i64,
    /// Top margin
    pub margin_top: i64,
    /// Bottom margin
    pub margin_bottom: i64,
    /// Left margin
    pub margin_left: i64,
    /// Right margin
    pub margin_right: i64,
    /// Number of layout columns
    pub column_count: u32,
    /// Gutter between layout columns
    pub column_gutter: i64,
}

/// A content block on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A positioned text frame holding paragraphs
    TextFrame(TextFrameBlock),

    /// A positioned table
    Table(Table),

    /// A positioned figure (image or rendered shape/group)
    Figure(Figure),
}

impl Block {
    /// Check if this block is a text frame.
    pub fn is_text_frame(&self) -> bool {
        matches!(self, Block::TextFrame(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Check if this block is a figure.
    pub fn is_figure(&self) -> bool {
        matches!(self, Block::Figure(_))
    }

    /// Paint-order index of the block.
    pub fn z_order(&self) -> u32 {
        match self {
            Block::TextFrame(tf) => tf.z_order,
            Block::Table(t) => t.z_order,
            Block::Figure(f) => f.z_order,
        }
    }
}

/// A positioned text frame block (fixed units unless noted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextFrameBlock {
    /// Source object id
    pub source_id: String,

    /// X position relative to the page
    pub x: i64,
    /// Y position relative to the page
    pub y: i64,
    /// Frame width
    pub width: i64,
    /// Frame height
    pub height: i64,

    /// Paint-order index from the flattener
    pub z_order: u32,

    /// Number of text columns
    pub column_count: u32,
    /// Gutter between text columns
    pub column_gutter: i64,

    /// Text insets
    pub inset_top: i64,
    /// Left inset
    pub inset_left: i64,
    /// Bottom inset
    pub inset_bottom: i64,
    /// Right inset
    pub inset_right: i64,

    /// Vertical justification (TopAlign, CenterAlign, BottomAlign, JustifyAlign)
    pub vertical_justification: Option<String>,

    /// Whether the text is set vertically
    pub vertical_text: bool,

    /// Fill color (`#RRGGBB`)
    pub fill_color: Option<String>,
    /// Stroke color (`#RRGGBB`)
    pub stroke_color: Option<String>,
    /// Stroke weight (points)
    pub stroke_weight: f64,
    /// Stroke type (Solid, Dashed, Dotted)
    pub stroke_type: Option<String>,
    /// Fill tint 0..=100
    pub fill_tint: Option<f64>,
    /// Stroke tint 0..=100
    pub stroke_tint: Option<f64>,
    /// Corner radius (points)
    pub corner_radius: f64,

    /// Whether the frame was hoisted out of a group; the group's
    /// rasterized figure does not include it
    pub from_group: bool,

    /// Paragraphs in reading order
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrameBlock {
    /// Whether any paragraph carries at least one inline item.
    pub fn has_content(&self) -> bool {
        self.paragraphs.iter().any(|p| !p.items.is_empty())
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What a figure block contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    /// A raster image
    Image,
    /// A vector shape rasterized by the rendering collaborator
    RenderedShape,
    /// A group rasterized as a single unit. Text frames hoisted out of
    /// the group are not part of the raster; they emit as their own
    /// blocks, flagged `from_group`.
    RenderedGroup,
}

/// A positioned figure block (fixed units unless noted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    /// Figure content kind
    pub kind: FigureKind,

    /// X position relative to the page
    pub x: i64,
    /// Y position relative to the page
    pub y: i64,
    /// Display width
    pub width: i64,
    /// Display height
    pub height: i64,

    /// Paint-order index from the flattener
    pub z_order: u32,

    /// Rotation in degrees (clockwise positive), if significant
    pub rotation: Option<f64>,

    /// Raster payload
    #[serde(skip_serializing, default)]
    pub image_data: Vec<u8>,

    /// Raster format (e.g. `png`, `jpeg`)
    pub image_format: Option<String>,

    /// Source asset URI
    pub image_path: Option<String>,

    /// Raster width in pixels
    pub pixel_width: u32,

    /// Raster height in pixels
    pub pixel_height: u32,

    /// Whether the figure covers enough of the page to be treated as a
    /// page background by the emitter
    pub background_candidate: bool,
}
