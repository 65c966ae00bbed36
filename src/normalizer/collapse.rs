//! Stage 3: plan how each inline object collapses into its host paragraph.

use super::pool::{ContentType, ObjectPool};
use std::collections::HashMap;

/// How an inline object becomes a paragraph-level leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseStrategy {
    /// Embed the object's raster asset directly
    EmbedImage,

    /// Hand the object to the rendering collaborator and embed the result
    Rasterize,

    /// Recurse into the object's story and inline its text
    ExtractText,
}

/// The collapse plan: strategy per inline object id.
///
/// A derived view over the pool; building it mutates nothing.
#[derive(Debug, Clone, Default)]
pub struct CollapsePlan {
    strategies: HashMap<String, CollapseStrategy>,
}

impl CollapsePlan {
    /// Strategy chosen for an inline object.
    pub fn strategy(&self, self_id: &str) -> Option<CollapseStrategy> {
        self.strategies.get(self_id).copied()
    }

    /// Number of planned objects.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Derive a collapse strategy for every inline pool entry.
///
/// Content type drives the choice: image frames embed their asset, text
/// frames extract their story text, shapes and groups go through the
/// rasterizer. A text frame whose story cannot be reached has no text to
/// extract and is downgraded to rasterization with a warning.
pub fn prepare_collapse(pool: &ObjectPool, warnings: &mut Vec<String>) -> CollapsePlan {
    let mut plan = CollapsePlan::default();

    for object in pool.iter().filter(|o| o.is_inline()) {
        let strategy = match object.content_type {
            ContentType::ImageFrame => CollapseStrategy::EmbedImage,
            ContentType::VectorShape | ContentType::Group => CollapseStrategy::Rasterize,
            ContentType::TextFrame => {
                if object.story_id.is_some() {
                    CollapseStrategy::ExtractText
                } else {
                    warnings.push(format!(
                        "inline text frame {} has no story; rasterizing instead",
                        object.self_id
                    ));
                    CollapseStrategy::Rasterize
                }
            }
        };
        plan.strategies.insert(object.self_id.clone(), strategy);
    }

    log::debug!("collapse plan covers {} inline objects", plan.len());
    plan
}
