//! Normalization options.

/// Options controlling the normalization pipeline.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Whether to load and embed image payloads (default: true)
    pub include_images: bool,

    /// Object-style name markers for frames whose inline content is
    /// deferred: their paragraphs are appended after the host story's
    /// paragraphs instead of collapsing at the anchor (default: empty)
    pub deferred_style_markers: Vec<String>,

    /// Fill-color name markers for editorial-note frames that are dropped
    /// from the output entirely (default: empty)
    pub editorial_fill_markers: Vec<String>,

    /// Font size in points assumed by capacity estimation when
    /// distributing text across linked frames (default: 10.0)
    pub default_font_size: f64,

    /// Line height as a multiple of font size, used by capacity
    /// estimation (default: 1.6)
    pub line_spacing_ratio: f64,

    /// Maximum `based_on` chain length walked during style resolution;
    /// longer (or cyclic) chains stop merging (default: 16)
    pub max_style_depth: usize,

    /// Fraction of the page area a figure must cover to be flagged as a
    /// page-background candidate (default: 0.8)
    pub background_area_threshold: f64,

    /// Whether story text is redistributed across linked frames so each
    /// chain member gets its own block (default: false, meaning the chain
    /// head receives the whole story)
    pub split_linked_frames: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            include_images: true,
            deferred_style_markers: Vec::new(),
            editorial_fill_markers: Vec::new(),
            default_font_size: 10.0,
            line_spacing_ratio: 1.6,
            max_style_depth: 16,
            background_area_threshold: 0.8,
            split_linked_frames: false,
        }
    }
}

impl NormalizeOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to load and embed image payloads.
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Set the deferred-frame object-style markers.
    pub fn with_deferred_style_markers(
        mut self,
        markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.deferred_style_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the editorial-note fill-color markers.
    pub fn with_editorial_fill_markers(
        mut self,
        markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.editorial_fill_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fallback font size in points.
    pub fn with_default_font_size(mut self, points: f64) -> Self {
        self.default_font_size = points;
        self
    }

    /// Set the line spacing ratio used by capacity estimation.
    pub fn with_line_spacing_ratio(mut self, ratio: f64) -> Self {
        self.line_spacing_ratio = ratio;
        self
    }

    /// Set the maximum style inheritance depth.
    pub fn with_max_style_depth(mut self, depth: usize) -> Self {
        self.max_style_depth = depth;
        self
    }

    /// Set the page-background area threshold (0.0 ..= 1.0).
    pub fn with_background_area_threshold(mut self, threshold: f64) -> Self {
        self.background_area_threshold = threshold;
        self
    }

    /// Set whether story text is redistributed across linked frames.
    pub fn with_split_linked_frames(mut self, split: bool) -> Self {
        self.split_linked_frames = split;
        self
    }

    /// Whether an object-style reference marks a deferred frame.
    pub fn is_deferred_style(&self, object_style: Option<&str>) -> bool {
        match object_style {
            Some(style) => self
                .deferred_style_markers
                .iter()
                .any(|marker| style.contains(marker.as_str())),
            None => false,
        }
    }

    /// Whether a fill-color reference marks an editorial-note frame.
    pub fn is_editorial_fill(&self, fill_color: Option<&str>) -> bool {
        match fill_color {
            Some(fill) => self
                .editorial_fill_markers
                .iter()
                .any(|marker| fill.contains(marker.as_str())),
            None => false,
        }
    }
}
