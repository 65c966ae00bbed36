//! Stage 2: classify pool objects as inline or floating.

use super::pool::{InlineAnchor, ObjectPool};
use crate::idml::{AnchoredPosition, IdmlDocument, InlineGraphic, Story, TextFrame};

/// Classify every pool object as inline or floating.
///
/// Takes the pool by value and returns it so stage ordering stays explicit
/// at the call site. Two passes:
///
/// 1. Walk every story's runs in reading order with a running character
///    offset, marking each referenced inline frame and graphic (and, for
///    groups, all of their descendants) with the story id and offset.
/// 2. Any remaining text frame whose anchored position is `Inline` or
///    `AboveLine` is anchored in a story the loader did not resolve; it is
///    marked inline with no story id so it never floats onto a page.
///
/// Classification is first-writer-wins: once inline, never reverted.
pub fn classify(mut pool: ObjectPool, document: &IdmlDocument) -> ObjectPool {
    let mut story_ids: Vec<&String> = document.stories.keys().collect();
    story_ids.sort();

    for story_id in story_ids {
        if let Some(story) = document.stories.get(story_id) {
            mark_story_anchors(&mut pool, story_id, story);
        }
    }

    let anchored_orphans: Vec<String> = pool
        .iter()
        .filter(|o| !o.is_inline())
        .filter_map(|o| document.find_text_frame(&o.self_id))
        .filter(|tf| is_anchored(tf))
        .map(|tf| tf.self_id.clone())
        .collect();
    for self_id in anchored_orphans {
        log::debug!("anchored frame without a resolved story: {}", self_id);
        mark(&mut pool, &self_id, InlineAnchor::default());
    }

    log::debug!("classify: {}", pool.summary());
    pool
}

fn is_anchored(frame: &TextFrame) -> bool {
    matches!(
        frame.anchored_position,
        Some(AnchoredPosition::Inline) | Some(AnchoredPosition::AboveLine)
    )
}

fn mark_story_anchors(pool: &mut ObjectPool, story_id: &str, story: &Story) {
    let mut char_offset = 0usize;
    for paragraph in &story.paragraphs {
        for run in &paragraph.runs {
            for frame in &run.inline_frames {
                mark_frame_tree(pool, story_id, char_offset, frame);
            }
            for graphic in &run.inline_graphics {
                mark_graphic_tree(pool, story_id, char_offset, graphic);
            }
            char_offset += run.content.as_deref().map_or(0, |t| t.chars().count());
        }
        // Paragraph boundary counts as one character, matching the
        // story_plain_text join.
        char_offset += 1;
    }
}

fn mark_frame_tree(pool: &mut ObjectPool, story_id: &str, char_offset: usize, frame: &TextFrame) {
    mark(
        pool,
        &frame.self_id,
        InlineAnchor {
            story_id: Some(story_id.to_string()),
            char_offset,
        },
    );
}

fn mark_graphic_tree(
    pool: &mut ObjectPool,
    story_id: &str,
    char_offset: usize,
    graphic: &InlineGraphic,
) {
    mark(
        pool,
        &graphic.self_id,
        InlineAnchor {
            story_id: Some(story_id.to_string()),
            char_offset,
        },
    );
    for frame in &graphic.child_text_frames {
        mark_frame_tree(pool, story_id, char_offset, frame);
    }
    for child in &graphic.child_graphics {
        mark_graphic_tree(pool, story_id, char_offset, child);
    }
}

fn mark(pool: &mut ObjectPool, self_id: &str, anchor: InlineAnchor) {
    if let Some(object) = pool.get_mut(self_id) {
        object.mark_inline(anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IDENTITY;
    use crate::normalizer::pool::{ContentType, FlatObject};
    use crate::idml::{CharacterRun, StoryParagraph};

    fn flat(id: &str, content_type: ContentType) -> FlatObject {
        FlatObject {
            self_id: id.to_string(),
            content_type,
            story_id: None,
            bounds: [0.0, 0.0, 10.0, 10.0],
            transform: IDENTITY,
            absolute_bbox: [0.0, 0.0, 10.0, 10.0],
            page_number: 1,
            z_order: 0,
            inline: None,
            from_group: false,
            parent_group_id: None,
        }
    }

    fn story_with_inline_graphic(story_id: &str, graphic_id: &str) -> Story {
        Story {
            self_id: story_id.to_string(),
            paragraphs: vec![StoryParagraph {
                runs: vec![
                    CharacterRun {
                        content: Some("before ".to_string()),
                        ..Default::default()
                    },
                    CharacterRun {
                        inline_graphics: vec![InlineGraphic {
                            self_id: graphic_id.to_string(),
                            ..Default::default()
                        }],
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_marks_referenced_graphics() {
        let mut doc = IdmlDocument::new();
        doc.stories.insert(
            "s1".to_string(),
            story_with_inline_graphic("s1", "g1"),
        );

        let mut pool = ObjectPool::new();
        pool.insert(flat("g1", ContentType::ImageFrame));
        pool.insert(flat("other", ContentType::ImageFrame));

        let pool = classify(pool, &doc);
        let anchor = pool.get("g1").unwrap().inline.clone().unwrap();
        assert_eq!(anchor.story_id.as_deref(), Some("s1"));
        assert_eq!(anchor.char_offset, 7);
        assert!(!pool.get("other").unwrap().is_inline());
    }

    #[test]
    fn test_classify_marks_group_descendants() {
        let mut graphic = InlineGraphic {
            self_id: "g1".to_string(),
            ..Default::default()
        };
        graphic.child_text_frames.push(TextFrame {
            self_id: "tf_child".to_string(),
            ..Default::default()
        });
        graphic.child_graphics.push(InlineGraphic {
            self_id: "g_child".to_string(),
            ..Default::default()
        });

        let mut story = Story {
            self_id: "s1".to_string(),
            ..Default::default()
        };
        story.paragraphs.push(StoryParagraph {
            runs: vec![CharacterRun {
                inline_graphics: vec![graphic],
                ..Default::default()
            }],
            ..Default::default()
        });

        let mut doc = IdmlDocument::new();
        doc.stories.insert("s1".to_string(), story);

        let mut pool = ObjectPool::new();
        pool.insert(flat("g1", ContentType::Group));
        pool.insert(flat("tf_child", ContentType::TextFrame));
        pool.insert(flat("g_child", ContentType::VectorShape));

        let pool = classify(pool, &doc);
        assert!(pool.get("g1").unwrap().is_inline());
        assert!(pool.get("tf_child").unwrap().is_inline());
        assert!(pool.get("g_child").unwrap().is_inline());
    }

    #[test]
    fn test_classify_anchored_frame_without_story() {
        let mut doc = IdmlDocument::new();
        doc.spreads.push(crate::idml::Spread {
            text_frames: vec![TextFrame {
                self_id: "tf_anchored".to_string(),
                anchored_position: Some(AnchoredPosition::Inline),
                ..Default::default()
            }],
            ..Default::default()
        });

        let mut pool = ObjectPool::new();
        pool.insert(flat("tf_anchored", ContentType::TextFrame));

        let pool = classify(pool, &doc);
        let anchor = pool.get("tf_anchored").unwrap().inline.clone().unwrap();
        assert!(anchor.story_id.is_none());
    }

    #[test]
    fn test_classify_first_writer_wins() {
        let mut doc = IdmlDocument::new();
        doc.stories.insert(
            "s1".to_string(),
            story_with_inline_graphic("s1", "g1"),
        );
        doc.stories.insert(
            "s2".to_string(),
            story_with_inline_graphic("s2", "g1"),
        );

        let mut pool = ObjectPool::new();
        pool.insert(flat("g1", ContentType::ImageFrame));

        let pool = classify(pool, &doc);
        // Stories are walked in sorted id order, so s1 wins.
        assert_eq!(
            pool.get("g1")
                .unwrap()
                .inline
                .as_ref()
                .unwrap()
                .story_id
                .as_deref(),
            Some("s1")
        );
    }
}
