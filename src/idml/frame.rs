//! Placed frame types: text frames, image frames, vector shapes, groups.

use crate::geometry::{self, Bounds, Transform};
use serde::{Deserialize, Serialize};

/// Resolve a frame link reference to its target id.
///
/// IDML uses the sentinel `"n"` (and occasionally an empty or `"null"`
/// string) to mean "no link".
pub fn link_target(link: Option<&str>) -> Option<&str> {
    match link {
        Some(id) if !id.is_empty() && id != "n" && !id.eq_ignore_ascii_case("null") => Some(id),
        _ => None,
    }
}

/// Anchored-object placement of a frame within a text flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchoredPosition {
    /// Placed inline at its anchor character.
    Inline,
    /// Placed above the anchor line.
    AboveLine,
    /// Custom anchored placement.
    Custom,
}

/// A placed text frame referencing a story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextFrame {
    /// Unique object id
    pub self_id: String,

    /// Id of the story this frame displays
    pub parent_story_id: Option<String>,

    /// Local bounds `[top, left, bottom, right]` (points)
    pub geometric_bounds: Option<Bounds>,

    /// Affine placement transform
    pub item_transform: Option<Transform>,

    /// Applied object style reference
    pub applied_object_style: Option<String>,

    /// Previous frame in a linked chain (`"n"` / empty = none)
    pub previous_text_frame: Option<String>,

    /// Next frame in a linked chain (`"n"` / empty = none)
    pub next_text_frame: Option<String>,

    /// Number of text columns
    pub column_count: u32,

    /// Gutter between columns (points)
    pub column_gutter: f64,

    /// Text inset `[top, left, bottom, right]` (points)
    pub inset_spacing: Option<[f64; 4]>,

    /// Fill color reference
    pub fill_color: Option<String>,

    /// Stroke color reference
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

    /// Vertical justification (TopAlign, CenterAlign, BottomAlign, JustifyAlign)
    pub vertical_justification: Option<String>,

    /// Anchored-object placement, if the frame is anchored
    pub anchored_position: Option<AnchoredPosition>,

    /// Id of the group this frame was hoisted out of, if any
    pub parent_group_id: Option<String>,
}

impl TextFrame {
    /// Untransformed frame width (points).
    pub fn width_points(&self) -> f64 {
        self.geometric_bounds.map(|b| geometry::width(&b)).unwrap_or(0.0)
    }

    /// Untransformed frame height (points).
    pub fn height_points(&self) -> f64 {
        self.geometric_bounds.map(|b| geometry::height(&b)).unwrap_or(0.0)
    }

    /// Whether this frame heads a linked chain (no previous frame).
    pub fn is_chain_head(&self) -> bool {
        link_target(self.previous_text_frame.as_deref()).is_none()
    }
}

/// A placed frame holding a linked raster or vector asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageFrame {
    /// Unique object id
    pub self_id: String,

    /// Local bounds `[top, left, bottom, right]` (points)
    pub geometric_bounds: Option<Bounds>,

    /// Affine placement transform
    pub item_transform: Option<Transform>,

    /// URI of the linked asset
    pub link_uri: Option<String>,

    /// Transform of the image within the frame
    pub image_transform: Option<Transform>,

    /// Intrinsic image bounds `[top, left, bottom, right]` (points)
    pub graphic_bounds: Option<Bounds>,

    /// Whether this frame was hoisted out of a group
    pub from_group: bool,
}

/// A placed vector shape (rectangle, oval, polygon, path).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorShape {
    /// Unique object id
    pub self_id: String,

    /// Local bounds `[top, left, bottom, right]` (points)
    pub geometric_bounds: Option<Bounds>,

    /// Affine placement transform
    pub item_transform: Option<Transform>,

    /// Fill color reference
    pub fill_color: Option<String>,

    /// Stroke color reference
    pub stroke_color: Option<String>,

    /// Stroke weight (points)
    pub stroke_weight: f64,

    /// Whether this shape was hoisted out of a group
    pub from_group: bool,

    /// Pre-classification by the loader: shape referenced from a story run
    pub inline: bool,

    /// Owning story when pre-classified inline
    pub parent_story_id: Option<String>,
}

/// A group of placed objects.
///
/// The loader hoists a group's frames into the owning spread's flat lists
/// (tagging them with the group id); the group record itself carries only
/// its own geometry and nested child groups, since a group may need to be
/// rasterized as a single unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    /// Unique object id
    pub self_id: String,

    /// Local bounds `[top, left, bottom, right]` (points)
    pub geometric_bounds: Option<Bounds>,

    /// Affine placement transform
    pub item_transform: Option<Transform>,

    /// Nested child groups
    pub child_groups: Vec<Group>,
}
