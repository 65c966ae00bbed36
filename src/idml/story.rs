//! Story (text flow) types: paragraphs, character runs, inline anchors.

use super::{Table, TextFrame};
use crate::geometry::{self, Bounds, Transform};
use serde::{Deserialize, Serialize};

/// A story: the text content shared by one or more linked text frames.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Story {
    /// Unique story id
    pub self_id: String,

    /// Paragraphs in reading order
    pub paragraphs: Vec<StoryParagraph>,

    /// Tables anchored in this story
    pub tables: Vec<Table>,

    /// Whether the story is set vertically
    pub vertical: bool,
}

impl Story {
    /// Whether the story has neither text content nor tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && !self.paragraphs.iter().any(|p| {
                p.runs
                    .iter()
                    .any(|r| r.content.as_deref().is_some_and(|t| !t.trim().is_empty()))
            })
    }
}

/// A paragraph of a story: style reference, local overrides, character runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryParagraph {
    /// Applied paragraph style reference (may carry a `ParagraphStyle/` prefix)
    pub applied_paragraph_style: Option<String>,

    /// Character runs in order
    pub runs: Vec<CharacterRun>,

    /// Justification (LeftAlign, CenterAlign, RightAlign, *Justified)
    pub justification: Option<String>,

    /// First-line indent (points)
    pub first_line_indent: Option<f64>,

    /// Left indent (points)
    pub left_indent: Option<f64>,

    /// Right indent (points)
    pub right_indent: Option<f64>,

    /// Space before the paragraph (points)
    pub space_before: Option<f64>,

    /// Space after the paragraph (points)
    pub space_after: Option<f64>,

    /// Whether paragraph shading is on
    pub shading_on: bool,

    /// Shading color reference
    pub shading_color: Option<String>,

    /// Shading tint 0..=100
    pub shading_tint: Option<f64>,
}

/// A run of characters with uniform styling, plus its inline anchors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterRun {
    /// Applied character style reference (may carry a `CharacterStyle/` prefix)
    pub applied_character_style: Option<String>,

    /// Font family override
    pub font_family: Option<String>,

    /// Font size override (points)
    pub font_size: Option<f64>,

    /// Fill color reference override
    pub fill_color: Option<String>,

    /// Font style override (Bold, Italic, ...)
    pub font_style: Option<String>,

    /// Baseline position (Subscript, Superscript)
    pub position: Option<String>,

    /// Letter tracking (1/1000 em)
    pub tracking: Option<f64>,

    /// Text content of the run
    pub content: Option<String>,

    /// Text frames anchored inline at this run
    pub inline_frames: Vec<TextFrame>,

    /// Graphics (rectangles, ovals, polygons, groups) anchored inline
    pub inline_graphics: Vec<InlineGraphic>,
}

impl CharacterRun {
    /// Whether the baseline position marks a subscript run.
    pub fn is_subscript(&self) -> bool {
        self.position.as_deref() == Some("Subscript")
    }

    /// Whether the baseline position marks a superscript run.
    pub fn is_superscript(&self) -> bool {
        self.position.as_deref() == Some("Superscript")
    }
}

/// A graphic anchored inline in a text run.
///
/// May wrap an image, or be a group whose children (frames and further
/// graphics) are all inline by inheritance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineGraphic {
    /// Unique object id
    pub self_id: String,

    /// Local bounds `[top, left, bottom, right]` (points)
    pub geometric_bounds: Option<Bounds>,

    /// Affine placement transform
    pub item_transform: Option<Transform>,

    /// Transform of a wrapped image within this graphic
    pub image_transform: Option<Transform>,

    /// Intrinsic bounds of a wrapped image (points)
    pub graphic_bounds: Option<Bounds>,

    /// URI of a linked image asset
    pub link_uri: Option<String>,

    /// Whether this graphic (or a descendant) carries image data
    pub has_image: bool,

    /// Text frames nested inside this graphic
    pub child_text_frames: Vec<TextFrame>,

    /// Graphics nested inside this graphic
    pub child_graphics: Vec<InlineGraphic>,
}

impl InlineGraphic {
    /// Untransformed width (points).
    pub fn width_points(&self) -> f64 {
        self.geometric_bounds.map(|b| geometry::width(&b)).unwrap_or(0.0)
    }

    /// Untransformed height (points).
    pub fn height_points(&self) -> f64 {
        self.geometric_bounds.map(|b| geometry::height(&b)).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_is_empty() {
        let mut story = Story::default();
        assert!(story.is_empty());

        story.paragraphs.push(StoryParagraph {
            runs: vec![CharacterRun {
                content: Some("   ".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        });
        assert!(story.is_empty());

        story.paragraphs[0].runs[0].content = Some("hello".to_string());
        assert!(!story.is_empty());
    }

    #[test]
    fn test_run_baseline_position() {
        let run = CharacterRun {
            position: Some("Superscript".to_string()),
            ..Default::default()
        };
        assert!(run.is_superscript());
        assert!(!run.is_subscript());
    }
}
