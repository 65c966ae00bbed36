//! Stage 4: build the canonical AST from the classified pool.
//!
//! Pages become sections; floating text frames become story blocks (one per
//! story, at the chain head); story tables become positioned table blocks;
//! floating images, shapes, and groups become figures. Inline objects
//! collapse into their host paragraphs according to the collapse plan, and
//! all style inheritance is resolved here so the emitted tree is
//! self-contained.

use super::collapse::{CollapsePlan, CollapseStrategy};
use super::options::NormalizeOptions;
use super::pool::{ContentType, FlatObject, ObjectPool};
use crate::geometry::{self, points_to_units};
use crate::idml::{
    self, AnchoredPosition, CharacterRun, IdmlDocument, ImageFrame, InlineGraphic, Page, Story,
    StoryParagraph, TextFrame,
};
use crate::model::{
    Block, Break, CellBorder, Document, Figure, FigureKind, FontDef, InlineItem, InlineObject,
    InlineObjectKind, Metadata, PageLayout, Paragraph, Section, StyleDef, Table, TableCell,
    TableRow, TextFrameBlock, TextRun,
};
use crate::raster::ImageLoader;
use crate::textfit;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// Maximum nesting depth for inline text frames whose stories contain
/// further inline frames.
const MAX_INLINE_DEPTH: usize = 8;

/// Rotations smaller than this (degrees) are treated as axis-aligned.
const MIN_ROTATION_DEG: f64 = 0.1;

/// Build the output document from the classified pool.
pub fn build(
    source: &IdmlDocument,
    pool: &ObjectPool,
    plan: &CollapsePlan,
    options: &NormalizeOptions,
    loader: &dyn ImageLoader,
    warnings: &mut Vec<String>,
) -> Document {
    AstBuilder {
        source,
        pool,
        plan,
        options,
        loader,
        warnings,
        consumed_stories: HashSet::new(),
        chain_pieces: HashMap::new(),
    }
    .build()
}

struct AstBuilder<'a, 'w> {
    source: &'a IdmlDocument,
    pool: &'a ObjectPool,
    plan: &'a CollapsePlan,
    options: &'a NormalizeOptions,
    loader: &'a dyn ImageLoader,
    warnings: &'w mut Vec<String>,
    consumed_stories: HashSet<String>,
    /// Fitted text per chain member when linked-frame splitting is on,
    /// keyed by frame id and filled before any page is built.
    chain_pieces: HashMap<String, String>,
}

impl<'a, 'w> AstBuilder<'a, 'w> {
    fn build(mut self) -> Document {
        let source = self.source;
        let mut document = Document::new();

        document.metadata = Metadata {
            source_file: None,
            source_format: "IDML".to_string(),
            converted: Some(Utc::now()),
            page_count: source.page_count(),
        };
        document.colors = source.colors.clone();
        self.populate_fonts(&mut document);
        self.populate_styles(&mut document);

        if self.options.split_linked_frames {
            self.distribute_chains();
        }

        for spread in &source.spreads {
            for page in &spread.pages {
                let section = self.build_section(page);
                document.add_section(section);
            }
        }

        // Pieces left over belong to frames that never landed on a page;
        // dropping them silently would lose story text.
        let mut unplaced: Vec<String> = self.chain_pieces.keys().cloned().collect();
        unplaced.sort();
        for frame_id in unplaced {
            self.warnings.push(format!(
                "fitted text for frame {frame_id} was never placed on a page"
            ));
        }
        document
    }

    /// Distribute every multi-frame story across its chain up front.
    ///
    /// Pieces are keyed by frame id so placement order does not matter: a
    /// chain member that precedes its head in reading order, or sits on an
    /// earlier page, still finds its piece when its page is built.
    /// Distributed text is emitted as unstyled paragraphs, the trade-off
    /// of this mode.
    fn distribute_chains(&mut self) {
        let source = self.source;
        for spread in &source.spreads {
            for frame in &spread.text_frames {
                if !frame.is_chain_head() {
                    continue;
                }
                let Some(story_id) = frame.parent_story_id.as_deref() else {
                    continue;
                };
                if self.consumed_stories.contains(story_id) {
                    continue;
                }
                let Some(story) = source.story(story_id) else {
                    continue;
                };
                if textfit::collect_chain(source, &frame.self_id).len() < 2 {
                    continue;
                }
                for (frame_id, piece) in textfit::distribute_story(
                    source,
                    story,
                    &frame.self_id,
                    self.options.default_font_size,
                    self.options.line_spacing_ratio,
                ) {
                    self.chain_pieces.insert(frame_id, piece);
                }
                self.consumed_stories.insert(story_id.to_string());
            }
        }
    }

    fn build_section(&mut self, page: &Page) -> Section {
        let mut section = Section::new(page.page_number);
        section.layout = PageLayout {
            page_width: points_to_units(page.width_points()),
            page_height: points_to_units(page.height_points()),
            margin_top: points_to_units(page.margin_top),
            margin_bottom: points_to_units(page.margin_bottom),
            margin_left: points_to_units(page.margin_left),
            margin_right: points_to_units(page.margin_right),
            column_count: page.column_count,
            column_gutter: points_to_units(page.column_gutter),
        };

        self.emit_text_frames(&mut section, page);
        self.emit_figures(&mut section, page);
        section
    }

    /// Floating text frames of the page in reading order: top to bottom,
    /// then left to right.
    fn emit_text_frames(&mut self, section: &mut Section, page: &Page) {
        let source = self.source;
        let mut frames: Vec<(&FlatObject, &TextFrame)> = self
            .pool
            .text_frames_on_page(page.page_number)
            .filter_map(|o| source.find_text_frame(&o.self_id).map(|tf| (o, tf)))
            .collect();
        frames.sort_by(|a, b| {
            let (ax, ay) = page_position(a.0, page);
            let (bx, by) = page_position(b.0, page);
            (ay, ax).partial_cmp(&(by, bx)).unwrap_or(std::cmp::Ordering::Equal)
        });

        for (object, frame) in frames {
            if self.options.is_editorial_fill(frame.fill_color.as_deref()) {
                log::debug!("skipping editorial-note frame {}", frame.self_id);
                continue;
            }

            if let Some(piece) = self.chain_pieces.remove(&frame.self_id) {
                // Story tables still emit once, at the chain head.
                if frame.is_chain_head() {
                    if let Some(story) =
                        frame.parent_story_id.as_deref().and_then(|id| source.story(id))
                    {
                        self.emit_story_tables(section, object, frame, page, story);
                    }
                }
                let block = self.frame_block(object, frame, page, plain_paragraphs(&piece));
                if block.has_content() {
                    section.add_block(Block::TextFrame(block));
                }
                continue;
            }

            if !frame.is_chain_head() {
                continue;
            }
            let Some(story_id) = frame.parent_story_id.as_deref() else {
                log::debug!("text frame {} has no story", frame.self_id);
                continue;
            };
            if self.consumed_stories.contains(story_id) {
                continue;
            }
            let Some(story) = source.story(story_id) else {
                log::debug!("story {} not found for frame {}", story_id, frame.self_id);
                continue;
            };
            self.consumed_stories.insert(story_id.to_string());

            let paragraphs = self.convert_story_paragraphs(story, 0);
            self.emit_story_tables(section, object, frame, page, story);

            let block = self.frame_block(object, frame, page, paragraphs);
            if block.has_content() {
                section.add_block(Block::TextFrame(block));
            }
        }
    }

    fn frame_block(
        &self,
        object: &FlatObject,
        frame: &TextFrame,
        page: &Page,
        paragraphs: Vec<Paragraph>,
    ) -> TextFrameBlock {
        let (x, y) = page_position(object, page);
        let insets = frame.inset_spacing.unwrap_or([0.0; 4]);
        let vertical = frame
            .parent_story_id
            .as_deref()
            .and_then(|id| self.source.story(id))
            .is_some_and(|s| s.vertical);

        TextFrameBlock {
            source_id: frame.self_id.clone(),
            x: points_to_units(x),
            y: points_to_units(y),
            width: points_to_units(geometry::transformed_width(&object.bounds, &object.transform)),
            height: points_to_units(geometry::transformed_height(
                &object.bounds,
                &object.transform,
            )),
            z_order: object.z_order,
            column_count: frame.column_count,
            column_gutter: points_to_units(frame.column_gutter),
            inset_top: points_to_units(insets[0]),
            inset_left: points_to_units(insets[1]),
            inset_bottom: points_to_units(insets[2]),
            inset_right: points_to_units(insets[3]),
            vertical_justification: frame.vertical_justification.clone(),
            vertical_text: vertical,
            fill_color: self.resolve_color(frame.fill_color.as_deref()),
            stroke_color: self.resolve_color(frame.stroke_color.as_deref()),
            stroke_weight: frame.stroke_weight,
            stroke_type: frame.stroke_type.clone(),
            fill_tint: frame.fill_tint,
            stroke_tint: frame.stroke_tint,
            corner_radius: frame.corner_radius,
            from_group: object.from_group,
            paragraphs,
        }
    }

    fn emit_story_tables(
        &mut self,
        section: &mut Section,
        object: &FlatObject,
        frame: &TextFrame,
        page: &Page,
        story: &Story,
    ) {
        let (x, y) = page_position(object, page);
        for table in &story.tables {
            let converted = self.convert_table(
                table,
                &frame.self_id,
                points_to_units(x),
                points_to_units(y),
                object.z_order,
            );
            section.add_block(Block::Table(converted));
        }
    }

    fn emit_figures(&mut self, section: &mut Section, page: &Page) {
        let source = self.source;
        let floating: Vec<&FlatObject> = self
            .pool
            .floating_on_page(page.page_number)
            .filter(|o| o.content_type != ContentType::TextFrame && !o.from_group)
            .collect();

        for object in floating {
            let figure = match object.content_type {
                ContentType::ImageFrame => {
                    let frame = source
                        .spreads
                        .iter()
                        .flat_map(|s| &s.image_frames)
                        .find(|f| f.self_id == object.self_id);
                    self.image_figure(object, frame, page)
                }
                ContentType::VectorShape => self.placeholder_figure(object, page, FigureKind::RenderedShape),
                ContentType::Group => self.placeholder_figure(object, page, FigureKind::RenderedGroup),
                ContentType::TextFrame => continue,
            };
            section.add_block(Block::Figure(figure));
        }
    }

    fn image_figure(
        &mut self,
        object: &FlatObject,
        frame: Option<&ImageFrame>,
        page: &Page,
    ) -> Figure {
        let mut figure = self.placeholder_figure(object, page, FigureKind::Image);
        let Some(frame) = frame else {
            return figure;
        };
        figure.image_path = frame.link_uri.clone();

        if !self.options.include_images {
            return figure;
        }
        if let Some(uri) = frame.link_uri.as_deref() {
            let width = geometry::transformed_width(&object.bounds, &object.transform);
            let height = geometry::transformed_height(&object.bounds, &object.transform);
            match self.loader.load_image(
                uri,
                width,
                height,
                frame.image_transform.as_ref(),
                frame.geometric_bounds.as_ref(),
                frame.graphic_bounds.as_ref(),
            ) {
                Some(loaded) => {
                    figure.image_data = loaded.data;
                    figure.image_format = Some(loaded.format);
                    figure.pixel_width = loaded.pixel_width;
                    figure.pixel_height = loaded.pixel_height;
                }
                None => {
                    self.warnings
                        .push(format!("failed to load image {uri} for {}", object.self_id));
                }
            }
        }
        figure
    }

    fn placeholder_figure(&self, object: &FlatObject, page: &Page, kind: FigureKind) -> Figure {
        let (x, y) = page_position(object, page);
        let width = geometry::transformed_width(&object.bounds, &object.transform);
        let height = geometry::transformed_height(&object.bounds, &object.transform);
        let rotation = geometry::extract_rotation(&object.transform);

        let page_area = page.width_points() * page.height_points();
        let background_candidate =
            page_area > 0.0 && width * height >= self.options.background_area_threshold * page_area;

        Figure {
            kind,
            x: points_to_units(x),
            y: points_to_units(y),
            width: points_to_units(width),
            height: points_to_units(height),
            z_order: object.z_order,
            rotation: (rotation.abs() > MIN_ROTATION_DEG).then_some(rotation),
            image_data: Vec::new(),
            image_format: None,
            image_path: None,
            pixel_width: 0,
            pixel_height: 0,
            background_candidate,
        }
    }

    // ----- story conversion -----

    fn convert_story_paragraphs(&mut self, story: &Story, depth: usize) -> Vec<Paragraph> {
        self.consumed_stories.insert(story.self_id.clone());
        let mut paragraphs = Vec::new();
        let mut deferred = Vec::new();
        for sp in &story.paragraphs {
            paragraphs.push(self.convert_paragraph(sp, &mut deferred, depth));
        }
        paragraphs.extend(deferred);
        paragraphs
    }

    fn convert_paragraph(
        &mut self,
        sp: &StoryParagraph,
        deferred: &mut Vec<Paragraph>,
        depth: usize,
    ) -> Paragraph {
        let para_style = sp.applied_paragraph_style.as_deref().and_then(|r| {
            resolve_style(
                &self.source.paragraph_styles,
                r,
                "ParagraphStyle/",
                self.options.max_style_depth,
            )
        });

        let mut paragraph = Paragraph {
            style_ref: sp.applied_paragraph_style.as_deref().map(clean_ref),
            alignment: sp.justification.clone(),
            first_line_indent: sp.first_line_indent.map(points_to_units),
            left_margin: sp.left_indent.map(points_to_units),
            right_margin: sp.right_indent.map(points_to_units),
            space_before: sp.space_before.map(points_to_units),
            space_after: sp.space_after.map(points_to_units),
            shading_on: sp.shading_on,
            shading_color: self.resolve_color(sp.shading_color.as_deref()),
            shading_tint: sp.shading_tint,
            items: Vec::new(),
        };

        for run in &sp.runs {
            self.convert_run(run, para_style.as_ref(), &mut paragraph, deferred, depth);
        }
        paragraph.trim_trailing_breaks();
        paragraph
    }

    fn convert_run(
        &mut self,
        run: &CharacterRun,
        para_style: Option<&idml::StyleDef>,
        paragraph: &mut Paragraph,
        deferred: &mut Vec<Paragraph>,
        depth: usize,
    ) {
        let char_style = run.applied_character_style.as_deref().and_then(|r| {
            resolve_style(
                &self.source.character_styles,
                r,
                "CharacterStyle/",
                self.options.max_style_depth,
            )
        });
        let cs = char_style.as_ref();

        // Precedence: run override, then character style, then paragraph
        // style.
        let font_family = run
            .font_family
            .clone()
            .or_else(|| cs.and_then(|s| s.font_family.clone()))
            .or_else(|| para_style.and_then(|s| s.font_family.clone()));
        let font_size = run
            .font_size
            .or_else(|| cs.and_then(|s| s.font_size))
            .or_else(|| para_style.and_then(|s| s.font_size));
        let font_style = run
            .font_style
            .clone()
            .or_else(|| cs.and_then(|s| s.font_style.clone()))
            .or_else(|| para_style.and_then(|s| s.font_style.clone()));
        let color_ref = run
            .fill_color
            .clone()
            .or_else(|| cs.and_then(|s| s.fill_color.clone()))
            .or_else(|| para_style.and_then(|s| s.fill_color.clone()));
        let tracking = run
            .tracking
            .or_else(|| cs.and_then(|s| s.tracking))
            .or_else(|| para_style.and_then(|s| s.tracking));

        if let Some(content) = run.content.as_deref() {
            let collapsed = collapse_newlines(content);
            for (i, segment) in collapsed.split('\n').enumerate() {
                if i > 0 {
                    paragraph.add_item(InlineItem::Break(Break::Line));
                }
                if segment.is_empty() {
                    continue;
                }
                paragraph.add_item(InlineItem::Text(TextRun {
                    character_style_ref: run.applied_character_style.as_deref().map(clean_ref),
                    text: segment.to_string(),
                    font_family: font_family.clone(),
                    font_style: font_style.clone(),
                    font_size: font_size.map(points_to_units),
                    color: self.resolve_color(color_ref.as_deref()),
                    letter_spacing: tracking.map(tracking_to_letter_spacing),
                    subscript: run.is_subscript(),
                    superscript: run.is_superscript(),
                }));
            }
        }

        for frame in &run.inline_frames {
            if self.is_deferred_frame(frame) {
                self.defer_frame(frame, deferred, depth);
            } else if let Some(object) = self.collapse_inline_frame(frame, depth) {
                paragraph.add_item(InlineItem::Object(object));
            }
        }
        for graphic in &run.inline_graphics {
            if let Some(object) = self.collapse_inline_graphic(graphic) {
                paragraph.add_item(InlineItem::Object(object));
            }
        }
    }

    fn is_deferred_frame(&self, frame: &TextFrame) -> bool {
        self.options
            .is_deferred_style(frame.applied_object_style.as_deref())
            || frame.anchored_position == Some(AnchoredPosition::Custom)
    }

    /// Append a deferred frame's story after the host paragraphs.
    fn defer_frame(&mut self, frame: &TextFrame, deferred: &mut Vec<Paragraph>, depth: usize) {
        let source = self.source;
        let Some(story) = frame.parent_story_id.as_deref().and_then(|id| source.story(id))
        else {
            log::debug!("deferred frame {} has no story", frame.self_id);
            return;
        };
        if depth >= MAX_INLINE_DEPTH {
            self.warnings.push(format!(
                "inline nesting too deep at frame {}; content dropped",
                frame.self_id
            ));
            return;
        }
        deferred.extend(self.convert_story_paragraphs(story, depth + 1));
    }

    fn collapse_inline_frame(&mut self, frame: &TextFrame, depth: usize) -> Option<InlineObject> {
        let strategy = match self.plan.strategy(&frame.self_id) {
            Some(strategy) => strategy,
            None if frame.parent_story_id.is_some() => CollapseStrategy::ExtractText,
            None => CollapseStrategy::Rasterize,
        };

        let width = points_to_units(frame.width_points());
        let height = points_to_units(frame.height_points());

        match strategy {
            CollapseStrategy::ExtractText => {
                let source = self.source;
                let story = frame.parent_story_id.as_deref().and_then(|id| source.story(id))?;
                if story.is_empty() {
                    log::debug!("dropping empty inline frame {}", frame.self_id);
                    return None;
                }
                if depth >= MAX_INLINE_DEPTH {
                    self.warnings.push(format!(
                        "inline nesting too deep at frame {}; content dropped",
                        frame.self_id
                    ));
                    return None;
                }
                let mut object = InlineObject::new(InlineObjectKind::InlineTextFrame, &frame.self_id);
                object.width = width;
                object.height = height;
                object.paragraphs = self.convert_story_paragraphs(story, depth + 1);
                object.tables = story
                    .tables
                    .iter()
                    .map(|t| self.convert_table(t, &frame.self_id, 0, 0, 0))
                    .collect();
                Some(object)
            }
            CollapseStrategy::Rasterize | CollapseStrategy::EmbedImage => {
                let mut object = InlineObject::new(InlineObjectKind::RenderedGroup, &frame.self_id);
                object.width = width;
                object.height = height;
                Some(object)
            }
        }
    }

    fn collapse_inline_graphic(&mut self, graphic: &InlineGraphic) -> Option<InlineObject> {
        if let Some((image, scale_x, scale_y)) = find_image_graphic(graphic) {
            // Display size from the outermost graphic when it has bounds;
            // otherwise from the image itself through the accumulated
            // scale of the descent path.
            let (width, height) = if graphic.geometric_bounds.is_some() {
                (graphic.width_points(), graphic.height_points())
            } else {
                (image.width_points() * scale_x, image.height_points() * scale_y)
            };

            let mut object = InlineObject::new(InlineObjectKind::Image, &graphic.self_id);
            object.width = points_to_units(width);
            object.height = points_to_units(height);

            if self.options.include_images {
                if let Some(uri) = image.link_uri.as_deref() {
                    match self.loader.load_image(
                        uri,
                        width,
                        height,
                        image.image_transform.as_ref(),
                        image.geometric_bounds.as_ref(),
                        image.graphic_bounds.as_ref(),
                    ) {
                        Some(loaded) => {
                            object.image_data = loaded.data;
                            object.image_format = Some(loaded.format);
                            object.pixel_width = loaded.pixel_width;
                            object.pixel_height = loaded.pixel_height;
                        }
                        None => {
                            self.warnings.push(format!(
                                "failed to load inline image {uri} at {}",
                                graphic.self_id
                            ));
                        }
                    }
                }
            }
            return Some(object);
        }

        if !graphic.child_text_frames.is_empty() {
            // A group whose only content is text: inline the frames'
            // stories as one nested mini-document.
            let mut object =
                InlineObject::new(InlineObjectKind::InlineTextFrame, &graphic.self_id);
            object.width = points_to_units(graphic.width_points());
            object.height = points_to_units(graphic.height_points());
            let source = self.source;
            for frame in &graphic.child_text_frames {
                if let Some(story) =
                    frame.parent_story_id.as_deref().and_then(|id| source.story(id))
                {
                    object.paragraphs.extend(self.convert_story_paragraphs(story, 1));
                }
            }
            if object.paragraphs.is_empty() {
                return None;
            }
            return Some(object);
        }

        let mut object = InlineObject::new(InlineObjectKind::RenderedGroup, &graphic.self_id);
        object.width = points_to_units(graphic.width_points());
        object.height = points_to_units(graphic.height_points());
        Some(object)
    }

    // ----- tables -----

    fn convert_table(
        &mut self,
        table: &idml::Table,
        source_id: &str,
        x: i64,
        y: i64,
        z_order: u32,
    ) -> Table {
        let column_widths: Vec<i64> =
            table.column_widths.iter().map(|w| points_to_units(*w)).collect();
        let row_heights: Vec<i64> = table
            .rows
            .iter()
            .map(|r| points_to_units(r.row_height))
            .collect();

        let mut rows = Vec::with_capacity(table.rows.len());
        for (row_index, row) in table.rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.cells.len());
            let mut column_index = 0u32;
            for cell in &row.cells {
                let col_span = cell.column_span.max(1);
                let row_span = cell.row_span.max(1);

                let width: i64 = column_widths
                    .iter()
                    .skip(column_index as usize)
                    .take(col_span as usize)
                    .sum();
                let height: i64 = row_heights
                    .iter()
                    .skip(row_index)
                    .take(row_span as usize)
                    .sum();

                let mut deferred = Vec::new();
                let mut paragraphs: Vec<Paragraph> = cell
                    .paragraphs
                    .iter()
                    .map(|p| self.convert_paragraph(p, &mut deferred, 1))
                    .collect();
                paragraphs.extend(deferred);

                cells.push(TableCell {
                    row_index: row_index as u32,
                    column_index,
                    row_span,
                    column_span: col_span,
                    width,
                    height,
                    fill_color: self.resolve_color(cell.fill_color.as_deref()),
                    vertical_align: cell.vertical_justification.clone(),
                    margin_top: points_to_units(cell.top_inset),
                    margin_bottom: points_to_units(cell.bottom_inset),
                    margin_left: points_to_units(cell.left_inset),
                    margin_right: points_to_units(cell.right_inset),
                    border_top: self.convert_border(cell.top_border.as_ref()),
                    border_bottom: self.convert_border(cell.bottom_border.as_ref()),
                    border_left: self.convert_border(cell.left_border.as_ref()),
                    border_right: self.convert_border(cell.right_border.as_ref()),
                    diagonal_top_left: cell.top_left_diagonal,
                    diagonal_top_right: cell.top_right_diagonal,
                    paragraphs,
                });
                column_index += col_span;
            }
            rows.push(TableRow {
                row_index: row_index as u32,
                row_height: row_heights[row_index],
                auto_grow: row.auto_grow,
                cells,
            });
        }

        Table {
            source_id: source_id.to_string(),
            x,
            y,
            z_order,
            row_count: table.rows.len() as u32,
            column_count: table.column_widths.len() as u32,
            width: column_widths.iter().sum(),
            height: row_heights.iter().sum(),
            column_widths,
            rows,
        }
    }

    fn convert_border(&self, border: Option<&idml::CellBorder>) -> Option<CellBorder> {
        border.map(|b| CellBorder {
            weight: b.stroke_weight,
            stroke_type: b.stroke_type.clone(),
            color: self.resolve_color(b.stroke_color.as_deref()),
            tint: b.stroke_tint,
        })
    }

    // ----- document tables -----

    fn populate_fonts(&self, document: &mut Document) {
        let mut families: Vec<&String> = self.source.fonts.keys().collect();
        families.sort();
        for family in families {
            let def = &self.source.fonts[family];
            document.fonts.push(FontDef {
                font_id: family.clone(),
                font_family: if def.font_family.is_empty() {
                    family.clone()
                } else {
                    def.font_family.clone()
                },
                font_type: def.font_type.clone(),
            });
        }
    }

    fn populate_styles(&self, document: &mut Document) {
        document.paragraph_styles = self.convert_style_map(&self.source.paragraph_styles, "ParagraphStyle/");
        document.character_styles = self.convert_style_map(&self.source.character_styles, "CharacterStyle/");
    }

    fn convert_style_map(
        &self,
        styles: &HashMap<String, idml::StyleDef>,
        prefix: &str,
    ) -> Vec<StyleDef> {
        let mut refs: Vec<&String> = styles.keys().collect();
        refs.sort();
        refs.into_iter()
            .filter_map(|r| resolve_style(styles, r, prefix, self.options.max_style_depth))
            .map(|def| self.convert_style(&def))
            .collect()
    }

    fn convert_style(&self, def: &idml::StyleDef) -> StyleDef {
        let (line_spacing, line_spacing_type) = match (def.leading, def.auto_leading) {
            (Some(leading), _) if def.leading_type.as_deref() != Some("Auto") => {
                (Some(points_to_units(leading)), Some("fixed".to_string()))
            }
            (_, Some(auto)) => (Some(auto.round() as i64), Some("percent".to_string())),
            _ => (None, None),
        };

        StyleDef {
            style_id: clean_ref(&def.self_ref),
            style_name: def.simple_name().to_string(),
            based_on: def.based_on.as_deref().map(clean_ref),
            alignment: def.text_alignment.clone(),
            first_line_indent: def.first_line_indent.map(points_to_units),
            left_margin: def.left_indent.map(points_to_units),
            right_margin: def.right_indent.map(points_to_units),
            space_before: def.space_before.map(points_to_units),
            space_after: def.space_after.map(points_to_units),
            line_spacing,
            line_spacing_type,
            font_family: def.font_family.clone(),
            font_style: def.font_style.clone(),
            font_size: def.font_size.map(points_to_units),
            text_color: self.resolve_color(def.fill_color.as_deref()),
            letter_spacing: def.tracking.map(tracking_to_letter_spacing),
        }
    }

    fn resolve_color(&self, color_ref: Option<&str>) -> Option<String> {
        let color_ref = color_ref?;
        if color_ref.starts_with('#') {
            return Some(color_ref.to_string());
        }
        self.source.resolve_color(color_ref).map(str::to_string)
    }
}

/// Position of a pool object relative to a page's top-left corner (points).
fn page_position(object: &FlatObject, page: &Page) -> (f64, f64) {
    let (x, y) = geometry::absolute_top_left(&object.bounds, &object.transform);
    let (px, py) = match (page.geometric_bounds, page.item_transform) {
        (Some(b), Some(t)) => geometry::absolute_top_left(&b, &t),
        (Some(b), None) => (b[1], b[0]),
        _ => (0.0, 0.0),
    };
    (x - px, y - py)
}

/// Fitted chain text as unstyled paragraphs, one per line.
fn plain_paragraphs(text: &str) -> Vec<Paragraph> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| {
            let mut para = Paragraph::new();
            if !line.is_empty() {
                para.add_item(InlineItem::Text(TextRun::new(line)));
            }
            para
        })
        .collect()
}

/// Strip the style namespace (`ParagraphStyle/`, `CharacterStyle/`, ...)
/// from a reference.
fn clean_ref(style_ref: &str) -> String {
    style_ref
        .split_once('/')
        .map(|(_, rest)| rest)
        .unwrap_or(style_ref)
        .to_string()
}

/// Letter tracking in 1/1000 em to letter spacing in percent.
fn tracking_to_letter_spacing(tracking: f64) -> i16 {
    (tracking / 10.0).round() as i16
}

/// Collapse runs of two or more newlines to a single newline.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_newline = false;
    for ch in text.chars() {
        if ch == '\n' {
            if !last_was_newline {
                out.push('\n');
            }
            last_was_newline = true;
        } else {
            out.push(ch);
            last_was_newline = false;
        }
    }
    out
}

/// Look up a style by reference, retrying with the namespace prefix.
fn lookup_style<'a>(
    styles: &'a HashMap<String, idml::StyleDef>,
    style_ref: &str,
    prefix: &str,
) -> Option<&'a idml::StyleDef> {
    styles
        .get(style_ref)
        .or_else(|| styles.get(&format!("{prefix}{style_ref}")))
}

/// Resolve a style through its `based_on` chain.
///
/// Child attributes win; parents only fill gaps. The walk is depth-bounded,
/// and a reference already seen ends it, so cyclic chains resolve to the
/// partial merge accumulated up to the repeat.
fn resolve_style(
    styles: &HashMap<String, idml::StyleDef>,
    style_ref: &str,
    prefix: &str,
    max_depth: usize,
) -> Option<idml::StyleDef> {
    let mut resolved = lookup_style(styles, style_ref, prefix)?.clone();
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(resolved.self_ref.clone());

    let mut parent_ref = resolved.based_on.clone();
    let mut depth = 0;
    while let Some(r) = parent_ref {
        if depth >= max_depth {
            log::warn!("style chain too deep at {style_ref}");
            break;
        }
        let Some(parent) = lookup_style(styles, &r, prefix) else {
            break;
        };
        if !seen.insert(parent.self_ref.clone()) {
            log::warn!("cycle in style chain at {style_ref}");
            break;
        }
        merge_parent(&mut resolved, parent);
        parent_ref = parent.based_on.clone();
        depth += 1;
    }
    Some(resolved)
}

/// Fill unset attributes of `child` from `parent`.
fn merge_parent(child: &mut idml::StyleDef, parent: &idml::StyleDef) {
    macro_rules! inherit {
        ($($field:ident),* $(,)?) => {
            $(if child.$field.is_none() {
                child.$field = parent.$field.clone();
            })*
        };
    }
    inherit!(
        font_family,
        font_size,
        fill_color,
        font_style,
        text_alignment,
        first_line_indent,
        left_indent,
        right_indent,
        space_before,
        space_after,
        leading,
        leading_type,
        auto_leading,
        tracking,
    );
}

/// The nearest descendant graphic carrying an image, with the scale
/// accumulated along the descent path.
fn find_image_graphic(graphic: &InlineGraphic) -> Option<(&InlineGraphic, f64, f64)> {
    if graphic.link_uri.is_some() || graphic.has_image {
        return Some((graphic, 1.0, 1.0));
    }
    for child in &graphic.child_graphics {
        if let Some((image, sx, sy)) = find_image_graphic(child) {
            let (cx, cy) = transform_scale(child.item_transform.as_ref());
            return Some((image, sx * cx, sy * cy));
        }
    }
    None
}

fn transform_scale(transform: Option<&geometry::Transform>) -> (f64, f64) {
    match transform {
        Some(t) => {
            let sx = (t[0] * t[0] + t[1] * t[1]).sqrt();
            let sy = (t[2] * t[2] + t[3] * t[3]).sqrt();
            (
                if sx > 0.0 { sx } else { 1.0 },
                if sy > 0.0 { sy } else { 1.0 },
            )
        }
        None => (1.0, 1.0),
    }
}
