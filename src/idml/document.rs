//! Document-level source graph.

use super::{FontDef, Spread, Story, StyleDef, TextFrame};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The complete IDML source document graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdmlDocument {
    /// Spreads in document order
    pub spreads: Vec<Spread>,

    /// Stories keyed by story id
    pub stories: HashMap<String, Story>,

    /// Paragraph styles keyed by style reference
    pub paragraph_styles: HashMap<String, StyleDef>,

    /// Character styles keyed by style reference
    pub character_styles: HashMap<String, StyleDef>,

    /// Fonts keyed by family name
    pub fonts: HashMap<String, FontDef>,

    /// Colors: reference → `#RRGGBB`
    pub colors: HashMap<String, String>,

    /// First page number of the document
    pub page_number_start: u32,
}

impl IdmlDocument {
    /// Create an empty document graph.
    pub fn new() -> Self {
        Self {
            page_number_start: 1,
            ..Default::default()
        }
    }

    /// Look up a story by id.
    pub fn story(&self, story_id: &str) -> Option<&Story> {
        self.stories.get(story_id)
    }

    /// Find a text frame anywhere in the document by id.
    pub fn find_text_frame(&self, self_id: &str) -> Option<&TextFrame> {
        self.spreads
            .iter()
            .find_map(|spread| spread.find_text_frame(self_id))
    }

    /// Resolve a fill/stroke color reference to a hex color.
    ///
    /// Retries with the `Color/` prefix when the direct key misses.
    pub fn resolve_color(&self, color_ref: &str) -> Option<&str> {
        self.colors
            .get(color_ref)
            .or_else(|| self.colors.get(&format!("Color/{}", color_ref)))
            .map(|s| s.as_str())
    }

    /// Total number of pages across all spreads.
    pub fn page_count(&self) -> u32 {
        self.spreads.iter().map(|s| s.pages.len() as u32).sum()
    }
}
