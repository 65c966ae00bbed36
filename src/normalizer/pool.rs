//! Flattened object pool: the arena shared by the pipeline stages.

use crate::geometry::{Bounds, Transform};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of placed object a pool entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// A text frame
    TextFrame,
    /// A frame holding a linked raster asset
    ImageFrame,
    /// A vector shape
    VectorShape,
    /// A group of objects
    Group,
}

/// Where an inline object is anchored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineAnchor {
    /// The story the anchor lives in; `None` when the object is anchored
    /// but its host story could not be determined
    pub story_id: Option<String>,

    /// Character offset of the anchor within the story
    pub char_offset: usize,
}

/// One flattened object: identity, geometry, placement, classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatObject {
    /// Unique object id
    pub self_id: String,

    /// Object kind
    pub content_type: ContentType,

    /// Story displayed by a text frame
    pub story_id: Option<String>,

    /// Local bounds `[top, left, bottom, right]` (points)
    pub bounds: Bounds,

    /// Placement transform
    pub transform: Transform,

    /// Axis-aligned bounding box in spread coordinates `[min_x, min_y,
    /// max_x, max_y]` (points)
    pub absolute_bbox: [f64; 4],

    /// Page the object belongs to (1-indexed)
    pub page_number: u32,

    /// Paint-order index, strictly increasing across the whole document
    pub z_order: u32,

    /// Inline anchor; `None` while the object is floating
    pub inline: Option<InlineAnchor>,

    /// Whether the object was hoisted out of a group
    pub from_group: bool,

    /// Id of the hoisting group, if any
    pub parent_group_id: Option<String>,
}

impl FlatObject {
    /// Whether the object has been classified inline.
    pub fn is_inline(&self) -> bool {
        self.inline.is_some()
    }

    /// Mark the object inline. First writer wins: a second call leaves the
    /// original anchor untouched and reports `false`.
    pub fn mark_inline(&mut self, anchor: InlineAnchor) -> bool {
        if self.inline.is_some() {
            return false;
        }
        self.inline = Some(anchor);
        true
    }
}

/// The arena of flattened objects.
///
/// Entries keep flatten order (which equals z-order). The id index makes
/// by-id access O(1); ids are unique by construction.
#[derive(Debug, Clone, Default)]
pub struct ObjectPool {
    objects: Vec<FlatObject>,
    index: HashMap<String, usize>,
}

impl ObjectPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Returns `false` (and drops the object) when the id
    /// is already present.
    pub fn insert(&mut self, object: FlatObject) -> bool {
        if self.index.contains_key(&object.self_id) {
            log::debug!("duplicate object id ignored: {}", object.self_id);
            return false;
        }
        self.index.insert(object.self_id.clone(), self.objects.len());
        self.objects.push(object);
        true
    }

    /// Look up an object by id.
    pub fn get(&self, self_id: &str) -> Option<&FlatObject> {
        self.index.get(self_id).map(|&i| &self.objects[i])
    }

    /// Look up an object mutably by id.
    pub fn get_mut(&mut self, self_id: &str) -> Option<&mut FlatObject> {
        self.index.get(self_id).map(|&i| &mut self.objects[i])
    }

    /// Whether an object id exists in the pool.
    pub fn contains(&self, self_id: &str) -> bool {
        self.index.contains_key(self_id)
    }

    /// Number of objects in the pool.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate objects in flatten (z) order.
    pub fn iter(&self) -> impl Iterator<Item = &FlatObject> {
        self.objects.iter()
    }

    /// Iterate objects mutably in flatten (z) order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FlatObject> {
        self.objects.iter_mut()
    }

    /// Floating (not inline) objects on a page, in z order.
    pub fn floating_on_page(&self, page_number: u32) -> impl Iterator<Item = &FlatObject> {
        self.objects
            .iter()
            .filter(move |o| o.page_number == page_number && !o.is_inline())
    }

    /// Floating text frames on a page, in z order.
    pub fn text_frames_on_page(&self, page_number: u32) -> impl Iterator<Item = &FlatObject> {
        self.floating_on_page(page_number)
            .filter(|o| o.content_type == ContentType::TextFrame)
    }

    /// Inline objects anchored in a story, in z order.
    pub fn inlines_for_story<'a>(
        &'a self,
        story_id: &'a str,
    ) -> impl Iterator<Item = &'a FlatObject> {
        self.objects.iter().filter(move |o| {
            o.inline
                .as_ref()
                .is_some_and(|a| a.story_id.as_deref() == Some(story_id))
        })
    }

    /// One-line summary of pool contents for debug logging.
    pub fn summary(&self) -> String {
        let mut text_frames = 0;
        let mut image_frames = 0;
        let mut shapes = 0;
        let mut groups = 0;
        let mut inline = 0;
        for o in &self.objects {
            match o.content_type {
                ContentType::TextFrame => text_frames += 1,
                ContentType::ImageFrame => image_frames += 1,
                ContentType::VectorShape => shapes += 1,
                ContentType::Group => groups += 1,
            }
            if o.is_inline() {
                inline += 1;
            }
        }
        format!(
            "{} objects ({} text frames, {} image frames, {} shapes, {} groups; {} inline)",
            self.objects.len(),
            text_frames,
            image_frames,
            shapes,
            groups,
            inline
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IDENTITY;

    fn flat(id: &str, content_type: ContentType, page: u32, z: u32) -> FlatObject {
        FlatObject {
            self_id: id.to_string(),
            content_type,
            story_id: None,
            bounds: [0.0, 0.0, 10.0, 10.0],
            transform: IDENTITY,
            absolute_bbox: [0.0, 0.0, 10.0, 10.0],
            page_number: page,
            z_order: z,
            inline: None,
            from_group: false,
            parent_group_id: None,
        }
    }

    #[test]
    fn test_insert_rejects_duplicate_ids() {
        let mut pool = ObjectPool::new();
        assert!(pool.insert(flat("u1", ContentType::TextFrame, 1, 0)));
        assert!(!pool.insert(flat("u1", ContentType::ImageFrame, 1, 1)));
        assert_eq!(pool.len(), 1);
        assert_eq!(
            pool.get("u1").unwrap().content_type,
            ContentType::TextFrame
        );
    }

    #[test]
    fn test_mark_inline_first_writer_wins() {
        let mut obj = flat("u1", ContentType::ImageFrame, 1, 0);
        assert!(obj.mark_inline(InlineAnchor {
            story_id: Some("s1".to_string()),
            char_offset: 4,
        }));
        assert!(!obj.mark_inline(InlineAnchor {
            story_id: Some("s2".to_string()),
            char_offset: 9,
        }));
        assert_eq!(
            obj.inline.unwrap().story_id.as_deref(),
            Some("s1")
        );
    }

    #[test]
    fn test_page_queries_exclude_inline() {
        let mut pool = ObjectPool::new();
        pool.insert(flat("u1", ContentType::TextFrame, 1, 0));
        pool.insert(flat("u2", ContentType::ImageFrame, 1, 1));
        pool.insert(flat("u3", ContentType::TextFrame, 2, 2));
        pool.get_mut("u2")
            .unwrap()
            .mark_inline(InlineAnchor::default());

        assert_eq!(pool.floating_on_page(1).count(), 1);
        assert_eq!(pool.text_frames_on_page(1).count(), 1);
        assert_eq!(pool.floating_on_page(2).count(), 1);
    }

    #[test]
    fn test_inlines_for_story() {
        let mut pool = ObjectPool::new();
        pool.insert(flat("u1", ContentType::ImageFrame, 1, 0));
        pool.insert(flat("u2", ContentType::ImageFrame, 1, 1));
        pool.get_mut("u1").unwrap().mark_inline(InlineAnchor {
            story_id: Some("s1".to_string()),
            char_offset: 0,
        });

        assert_eq!(pool.inlines_for_story("s1").count(), 1);
        assert_eq!(pool.inlines_for_story("s2").count(), 0);
    }
}
