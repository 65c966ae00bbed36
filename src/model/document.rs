//! Document-level AST types.

use super::{Section, StyleDef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The normalized document: ordered sections plus shared tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    /// Sections, one per output page, in page order
    pub sections: Vec<Section>,

    /// Rasterized page backgrounds supplied by the rendering collaborator
    pub backgrounds: Vec<PageBackground>,

    /// Font table
    pub fonts: Vec<FontDef>,

    /// Paragraph styles (inheritance already resolved)
    pub paragraph_styles: Vec<StyleDef>,

    /// Character styles (inheritance already resolved)
    pub character_styles: Vec<StyleDef>,

    /// Colors: reference → `#RRGGBB`
    pub colors: HashMap<String, String>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            sections: Vec::new(),
            backgrounds: Vec::new(),
            fonts: Vec::new(),
            paragraph_styles: Vec::new(),
            character_styles: Vec::new(),
            colors: HashMap::new(),
        }
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Number of sections (output pages).
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up a paragraph style by id.
    pub fn paragraph_style(&self, style_id: &str) -> Option<&StyleDef> {
        self.paragraph_styles.iter().find(|s| s.style_id == style_id)
    }

    /// Look up a character style by id.
    pub fn character_style(&self, style_id: &str) -> Option<&StyleDef> {
        self.character_styles.iter().find(|s| s.style_id == style_id)
    }

    /// Get plain text content of the whole document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Source file name
    pub source_file: Option<String>,

    /// Source format identifier
    pub source_format: String,

    /// Conversion timestamp
    pub converted: Option<DateTime<Utc>>,

    /// Total number of output pages
    pub page_count: u32,
}

impl Metadata {
    /// Create metadata for an IDML source.
    pub fn idml(source_file: impl Into<String>) -> Self {
        Self {
            source_file: Some(source_file.into()),
            source_format: "IDML".to_string(),
            converted: Some(Utc::now()),
            page_count: 0,
        }
    }
}

/// A rasterized page background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBackground {
    /// Page number this background belongs to
    pub page_number: u32,

    /// Page width (fixed units)
    pub page_width: i64,

    /// Page height (fixed units)
    pub page_height: i64,

    /// PNG payload
    #[serde(skip_serializing, default)]
    pub png_data: Vec<u8>,

    /// Raster width in pixels
    pub pixel_width: u32,

    /// Raster height in pixels
    pub pixel_height: u32,
}

/// An entry in the document font table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontDef {
    /// Stable font id
    pub font_id: String,

    /// Font family name
    pub font_family: String,

    /// Font technology (e.g. `OpenTypeCFF`, `TrueType`)
    pub font_type: Option<String>,
}
