//! Integration tests for the normalization pipeline.

use unidml::geometry::IDENTITY;
use unidml::idml::{
    CharacterRun, Group, IdmlDocument, ImageFrame, InlineGraphic, Page, Spread, Story,
    StoryParagraph, TextFrame,
};
use unidml::model::{from_json, to_json, Block, InlineItem, JsonFormat};
use unidml::normalizer::{classify, flatten};
use unidml::raster::{ImageLoader, LoadedImage};
use unidml::{normalize, normalize_with_loader, NormalizeOptions};

fn page(number: u32) -> Page {
    Page {
        self_id: format!("page{number}"),
        page_number: number,
        geometric_bounds: Some([0.0, 0.0, 792.0, 612.0]),
        item_transform: Some(IDENTITY),
        margin_top: 36.0,
        margin_bottom: 36.0,
        margin_left: 36.0,
        margin_right: 36.0,
        column_count: 1,
        column_gutter: 12.0,
    }
}

fn text_frame(id: &str, story_id: &str, bounds: [f64; 4]) -> TextFrame {
    TextFrame {
        self_id: id.to_string(),
        parent_story_id: Some(story_id.to_string()),
        geometric_bounds: Some(bounds),
        item_transform: Some(IDENTITY),
        ..Default::default()
    }
}

fn story(id: &str, text: &str) -> Story {
    Story {
        self_id: id.to_string(),
        paragraphs: vec![StoryParagraph {
            runs: vec![CharacterRun {
                content: Some(text.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn single_page_document() -> IdmlDocument {
    let mut doc = IdmlDocument::new();
    doc.stories.insert("s1".to_string(), story("s1", "Body text."));
    doc.spreads.push(Spread {
        self_id: "spread1".to_string(),
        pages: vec![page(1)],
        text_frames: vec![text_frame("tf1", "s1", [100.0, 50.0, 300.0, 400.0])],
        ..Default::default()
    });
    doc
}

#[test]
fn test_single_story_single_block() {
    let result = normalize(&single_page_document(), &NormalizeOptions::default()).unwrap();
    let section = &result.document.sections[0];
    assert_eq!(section.blocks.len(), 1);
    assert_eq!(section.plain_text(), "Body text.");
}

#[test]
fn test_story_emitted_once_across_frames() {
    let mut doc = single_page_document();
    // Second frame linked behind the first; same story.
    doc.spreads[0].text_frames[0].next_text_frame = Some("tf2".to_string());
    doc.spreads[0].text_frames.push(TextFrame {
        previous_text_frame: Some("tf1".to_string()),
        ..text_frame("tf2", "s1", [350.0, 50.0, 500.0, 400.0])
    });
    // And an unlinked duplicate head pointing at the same story.
    doc.spreads[0]
        .text_frames
        .push(text_frame("tf3", "s1", [520.0, 50.0, 600.0, 400.0]));

    let result = normalize(&doc, &NormalizeOptions::default()).unwrap();
    let text_blocks = result.document.sections[0]
        .blocks
        .iter()
        .filter(|b| b.is_text_frame())
        .count();
    assert_eq!(text_blocks, 1);
}

#[test]
fn test_frames_sorted_by_reading_order() {
    let mut doc = IdmlDocument::new();
    doc.stories.insert("sa".to_string(), story("sa", "upper"));
    doc.stories.insert("sb".to_string(), story("sb", "lower-left"));
    doc.stories.insert("sc".to_string(), story("sc", "lower-right"));
    doc.spreads.push(Spread {
        pages: vec![page(1)],
        text_frames: vec![
            text_frame("tf_lr", "sc", [400.0, 300.0, 500.0, 500.0]),
            text_frame("tf_up", "sa", [50.0, 200.0, 150.0, 400.0]),
            text_frame("tf_ll", "sb", [400.0, 20.0, 500.0, 200.0]),
        ],
        ..Default::default()
    });

    let result = normalize(&doc, &NormalizeOptions::default()).unwrap();
    let texts: Vec<String> = result.document.sections[0]
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::TextFrame(tf) => Some(tf.plain_text()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, ["upper", "lower-left", "lower-right"]);
}

#[test]
fn test_classification_exclusivity() {
    // An image frame referenced from story text must not also float.
    let mut doc = single_page_document();
    doc.stories.get_mut("s1").unwrap().paragraphs[0].runs[0]
        .inline_graphics
        .push(InlineGraphic {
            self_id: "img1".to_string(),
            geometric_bounds: Some([0.0, 0.0, 40.0, 40.0]),
            link_uri: Some("Links/photo.png".to_string()),
            ..Default::default()
        });
    doc.spreads[0].image_frames.push(ImageFrame {
        self_id: "img1".to_string(),
        geometric_bounds: Some([0.0, 0.0, 40.0, 40.0]),
        item_transform: Some(IDENTITY),
        ..Default::default()
    });

    let pool = classify(flatten(&doc), &doc);
    assert!(pool.get("img1").unwrap().is_inline());

    let result = normalize(&doc, &NormalizeOptions::new().with_images(false)).unwrap();
    let section = &result.document.sections[0];
    assert!(!section.blocks.iter().any(|b| b.is_figure()));

    let block = section
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::TextFrame(tf) => Some(tf),
            _ => None,
        })
        .unwrap();
    let has_inline_object = block.paragraphs[0]
        .items
        .iter()
        .any(|i| matches!(i, InlineItem::Object(_)));
    assert!(has_inline_object);
}

#[test]
fn test_floating_image_becomes_figure() {
    let mut doc = single_page_document();
    doc.spreads[0].image_frames.push(ImageFrame {
        self_id: "img1".to_string(),
        geometric_bounds: Some([200.0, 100.0, 400.0, 300.0]),
        item_transform: Some(IDENTITY),
        link_uri: Some("Links/photo.png".to_string()),
        ..Default::default()
    });

    let result = normalize(&doc, &NormalizeOptions::new().with_images(false)).unwrap();
    let figure = result.document.sections[0]
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::Figure(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert_eq!(figure.image_path.as_deref(), Some("Links/photo.png"));
    assert_eq!(figure.width, 20_000);
    assert_eq!(figure.height, 20_000);
    assert!(!figure.background_candidate);
}

#[test]
fn test_full_page_image_flagged_as_background() {
    let mut doc = single_page_document();
    doc.spreads[0].image_frames.push(ImageFrame {
        self_id: "bg".to_string(),
        geometric_bounds: Some([0.0, 0.0, 792.0, 612.0]),
        item_transform: Some(IDENTITY),
        link_uri: Some("Links/bg.png".to_string()),
        ..Default::default()
    });

    let result = normalize(&doc, &NormalizeOptions::new().with_images(false)).unwrap();
    let figure = result.document.sections[0]
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::Figure(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert!(figure.background_candidate);
}

struct StubLoader;

impl ImageLoader for StubLoader {
    fn load_image(
        &self,
        uri: &str,
        _display_width: f64,
        _display_height: f64,
        _image_transform: Option<&[f64; 6]>,
        _frame_bounds: Option<&[f64; 4]>,
        _graphic_bounds: Option<&[f64; 4]>,
    ) -> Option<LoadedImage> {
        if uri.ends_with(".png") {
            Some(LoadedImage {
                data: vec![1, 2, 3],
                format: "png".to_string(),
                pixel_width: 64,
                pixel_height: 32,
            })
        } else {
            None
        }
    }
}

#[test]
fn test_image_loading_and_failure_warning() {
    let mut doc = single_page_document();
    doc.spreads[0].image_frames.push(ImageFrame {
        self_id: "ok".to_string(),
        geometric_bounds: Some([0.0, 0.0, 50.0, 50.0]),
        item_transform: Some(IDENTITY),
        link_uri: Some("Links/good.png".to_string()),
        ..Default::default()
    });
    doc.spreads[0].image_frames.push(ImageFrame {
        self_id: "bad".to_string(),
        geometric_bounds: Some([100.0, 0.0, 150.0, 50.0]),
        item_transform: Some(IDENTITY),
        link_uri: Some("Links/missing.tif".to_string()),
        ..Default::default()
    });

    let result =
        normalize_with_loader(&doc, &NormalizeOptions::default(), &StubLoader).unwrap();

    let figures: Vec<_> = result.document.sections[0]
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Figure(f) => Some(f),
            _ => None,
        })
        .collect();
    assert_eq!(figures.len(), 2);

    let loaded = figures
        .iter()
        .find(|f| f.image_path.as_deref() == Some("Links/good.png"))
        .unwrap();
    assert_eq!(loaded.image_data, vec![1, 2, 3]);
    assert_eq!(loaded.pixel_width, 64);

    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("missing.tif"));
}

#[test]
fn test_deferred_frame_appended_after_host_paragraphs() {
    let mut doc = IdmlDocument::new();
    doc.stories
        .insert("notes".to_string(), story("notes", "appended note"));

    let mut host = story("s1", "first line");
    host.paragraphs.push(StoryParagraph {
        runs: vec![CharacterRun {
            content: Some("second line".to_string()),
            inline_frames: vec![TextFrame {
                self_id: "note_frame".to_string(),
                parent_story_id: Some("notes".to_string()),
                applied_object_style: Some("ObjectStyle/NoteBox".to_string()),
                geometric_bounds: Some([0.0, 0.0, 40.0, 120.0]),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    });
    doc.stories.insert("s1".to_string(), host);

    doc.spreads.push(Spread {
        pages: vec![page(1)],
        text_frames: vec![text_frame("tf1", "s1", [50.0, 50.0, 400.0, 400.0])],
        ..Default::default()
    });

    let options = NormalizeOptions::new().with_deferred_style_markers(["NoteBox"]);
    let result = normalize(&doc, &options).unwrap();

    let block = result.document.sections[0]
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::TextFrame(tf) => Some(tf),
            _ => None,
        })
        .unwrap();
    let texts: Vec<String> = block.paragraphs.iter().map(|p| p.plain_text()).collect();
    assert_eq!(texts, ["first line", "second line", "appended note"]);
}

#[test]
fn test_editorial_frame_skipped() {
    let mut doc = single_page_document();
    doc.stories
        .insert("s2".to_string(), story("s2", "do not print"));
    doc.spreads[0].text_frames.push(TextFrame {
        fill_color: Some("Color/ProofMark".to_string()),
        ..text_frame("tf_note", "s2", [500.0, 50.0, 600.0, 400.0])
    });

    let options = NormalizeOptions::new().with_editorial_fill_markers(["ProofMark"]);
    let result = normalize(&doc, &options).unwrap();
    assert_eq!(result.document.plain_text(), "Body text.");
}

#[test]
fn test_style_tables_populated_and_resolved() {
    let mut doc = single_page_document();
    doc.paragraph_styles.insert(
        "ParagraphStyle/Base".to_string(),
        unidml::idml::StyleDef {
            self_ref: "ParagraphStyle/Base".to_string(),
            font_family: Some("Minion Pro".to_string()),
            font_size: Some(11.0),
            ..Default::default()
        },
    );
    doc.paragraph_styles.insert(
        "ParagraphStyle/Heading".to_string(),
        unidml::idml::StyleDef {
            self_ref: "ParagraphStyle/Heading".to_string(),
            based_on: Some("ParagraphStyle/Base".to_string()),
            font_size: Some(18.0),
            ..Default::default()
        },
    );

    let result = normalize(&doc, &NormalizeOptions::default()).unwrap();
    let heading = result.document.paragraph_style("Heading").unwrap();
    assert_eq!(heading.font_size, Some(1_800));
    assert_eq!(heading.font_family.as_deref(), Some("Minion Pro"));
}

#[test]
fn test_run_styling_resolved_into_text_runs() {
    let mut doc = single_page_document();
    doc.colors
        .insert("Color/Warm".to_string(), "#cc3300".to_string());
    doc.character_styles.insert(
        "CharacterStyle/Em".to_string(),
        unidml::idml::StyleDef {
            self_ref: "CharacterStyle/Em".to_string(),
            font_style: Some("Italic".to_string()),
            ..Default::default()
        },
    );
    let run = &mut doc.stories.get_mut("s1").unwrap().paragraphs[0].runs[0];
    run.applied_character_style = Some("CharacterStyle/Em".to_string());
    run.font_size = Some(9.5);
    run.fill_color = Some("Warm".to_string());
    run.tracking = Some(50.0);

    let result = normalize(&doc, &NormalizeOptions::default()).unwrap();
    let block = result.document.sections[0]
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::TextFrame(tf) => Some(tf),
            _ => None,
        })
        .unwrap();
    let InlineItem::Text(text_run) = &block.paragraphs[0].items[0] else {
        panic!("expected a text run");
    };
    assert_eq!(text_run.character_style_ref.as_deref(), Some("Em"));
    assert_eq!(text_run.font_style.as_deref(), Some("Italic"));
    assert_eq!(text_run.font_size, Some(950));
    assert_eq!(text_run.color.as_deref(), Some("#cc3300"));
    assert_eq!(text_run.letter_spacing, Some(5));
}

#[test]
fn test_split_linked_frames_head_below_continuation() {
    // 90pt x 160pt at the default 10pt/1.6 metrics holds 100 chars.
    // The chain head sits lower on the page than its continuation, so
    // reading order visits the continuation first.
    let mut doc = IdmlDocument::new();
    doc.stories.insert("s1".to_string(), story("s1", &"a".repeat(300)));
    doc.spreads.push(Spread {
        pages: vec![page(1)],
        text_frames: vec![
            TextFrame {
                next_text_frame: Some("f2".to_string()),
                ..text_frame("f1", "s1", [400.0, 50.0, 560.0, 140.0])
            },
            TextFrame {
                previous_text_frame: Some("f1".to_string()),
                ..text_frame("f2", "s1", [50.0, 50.0, 210.0, 140.0])
            },
        ],
        ..Default::default()
    });

    let options = NormalizeOptions::new().with_split_linked_frames(true);
    let result = normalize(&doc, &options).unwrap();
    assert!(result.warnings.is_empty());

    let texts: Vec<String> = result.document.sections[0]
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::TextFrame(tf) => Some(tf.plain_text()),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 2);
    let total: usize = texts.iter().map(|t| t.chars().count()).sum();
    assert_eq!(total, 300);
}

#[test]
fn test_split_linked_frames_unplaced_member_warns() {
    // The continuation frame has no bounds and never lands on a page;
    // its fitted piece must surface as a warning, not vanish.
    let mut doc = IdmlDocument::new();
    doc.stories.insert("s1".to_string(), story("s1", &"a".repeat(300)));
    doc.spreads.push(Spread {
        pages: vec![page(1)],
        text_frames: vec![
            TextFrame {
                next_text_frame: Some("f2".to_string()),
                ..text_frame("f1", "s1", [50.0, 50.0, 210.0, 140.0])
            },
            TextFrame {
                self_id: "f2".to_string(),
                parent_story_id: Some("s1".to_string()),
                previous_text_frame: Some("f1".to_string()),
                ..Default::default()
            },
        ],
        ..Default::default()
    });

    let options = NormalizeOptions::new().with_split_linked_frames(true);
    let result = normalize(&doc, &options).unwrap();
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("f2"));
}

#[test]
fn test_grouped_text_frame_emits_alongside_group_figure() {
    let mut doc = single_page_document();
    doc.spreads[0].groups.push(Group {
        self_id: "g1".to_string(),
        geometric_bounds: Some([100.0, 100.0, 300.0, 300.0]),
        item_transform: Some(IDENTITY),
        ..Default::default()
    });
    doc.stories.insert("s2".to_string(), story("s2", "grouped text"));
    doc.spreads[0].text_frames.push(TextFrame {
        parent_group_id: Some("g1".to_string()),
        ..text_frame("tf_g", "s2", [120.0, 120.0, 200.0, 280.0])
    });

    let result = normalize(&doc, &NormalizeOptions::default()).unwrap();
    let section = &result.document.sections[0];

    // The group rasterizes as a single figure whose raster excludes the
    // hoisted text frame; the text stays structured in its own block.
    assert!(section.blocks.iter().any(|b| b.is_figure()));
    let block = section
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::TextFrame(tf) if tf.source_id == "tf_g" => Some(tf),
            _ => None,
        })
        .unwrap();
    assert!(block.from_group);
    assert_eq!(block.plain_text(), "grouped text");
}

#[test]
fn test_json_round_trip_of_normalized_document() {
    let result = normalize(&single_page_document(), &NormalizeOptions::default()).unwrap();
    let json = to_json(&result.document, JsonFormat::Compact).unwrap();
    let restored = from_json(&json).unwrap();
    assert_eq!(restored.plain_text(), result.document.plain_text());
    assert_eq!(restored.section_count(), 1);
}
