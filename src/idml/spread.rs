//! Spread and page types.

use super::{Group, ImageFrame, TextFrame, VectorShape};
use crate::geometry::{self, Bounds, Transform};
use serde::{Deserialize, Serialize};

/// A spread: a one- or two-page canvas holding placed objects.
///
/// The loader hoists frames nested inside groups into the flat per-spread
/// lists below (tagged with their parent group id), so the flattener sees
/// every object exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spread {
    /// Unique spread id
    pub self_id: String,

    /// Pages on this spread, in order
    pub pages: Vec<Page>,

    /// Text frames placed on this spread
    pub text_frames: Vec<TextFrame>,

    /// Image frames placed on this spread
    pub image_frames: Vec<ImageFrame>,

    /// Vector shapes placed on this spread
    pub vector_shapes: Vec<VectorShape>,

    /// Top-level groups placed on this spread
    pub groups: Vec<Group>,
}

impl Spread {
    /// Find a text frame on this spread by id.
    pub fn find_text_frame(&self, self_id: &str) -> Option<&TextFrame> {
        self.text_frames.iter().find(|tf| tf.self_id == self_id)
    }
}

/// A single page within a spread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Unique page id
    pub self_id: String,

    /// Page number (1-indexed, document order)
    pub page_number: u32,

    /// Page bounds `[top, left, bottom, right]` (points)
    pub geometric_bounds: Option<Bounds>,

    /// Page placement transform within the spread
    pub item_transform: Option<Transform>,

    /// Top margin (points)
    pub margin_top: f64,

    /// Bottom margin (points)
    pub margin_bottom: f64,

    /// Left margin (points)
    pub margin_left: f64,

    /// Right margin (points)
    pub margin_right: f64,

    /// Number of layout columns
    pub column_count: u32,

    /// Gutter between layout columns (points)
    pub column_gutter: f64,
}

impl Page {
    /// Page width (points).
    pub fn width_points(&self) -> f64 {
        self.geometric_bounds.map(|b| geometry::width(&b)).unwrap_or(0.0)
    }

    /// Page height (points).
    pub fn height_points(&self) -> f64 {
        self.geometric_bounds.map(|b| geometry::height(&b)).unwrap_or(0.0)
    }
}
