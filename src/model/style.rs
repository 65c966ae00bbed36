//! Resolved style definitions.

use serde::{Deserialize, Serialize};

/// A paragraph or character style with inheritance already resolved.
///
/// All lengths are in fixed units. `None` means the style chain never set
/// the property and the emitter's default applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleDef {
    /// Stable style id (namespace prefix stripped)
    pub style_id: String,

    /// Display name
    pub style_name: String,

    /// Parent style id, if any remained unresolvable
    pub based_on: Option<String>,

    /// Alignment (LeftAlign, CenterAlign, RightAlign, *Justified)
    pub alignment: Option<String>,

    /// First-line indent
    pub first_line_indent: Option<i64>,

    /// Left margin
    pub left_margin: Option<i64>,

    /// Right margin
    pub right_margin: Option<i64>,

    /// Space before the paragraph
    pub space_before: Option<i64>,

    /// Space after the paragraph
    pub space_after: Option<i64>,

    /// Line spacing value; interpretation depends on `line_spacing_type`
    pub line_spacing: Option<i64>,

    /// `percent` for auto leading, `fixed` for point leading
    pub line_spacing_type: Option<String>,

    /// Font family
    pub font_family: Option<String>,

    /// Font style (Bold, Italic, ...)
    pub font_style: Option<String>,

    /// Font size
    pub font_size: Option<i64>,

    /// Text color (`#RRGGBB`)
    pub text_color: Option<String>,

    /// Letter spacing in percent
    pub letter_spacing: Option<i16>,
}
