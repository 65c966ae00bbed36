//! Source style and font definitions.

use serde::{Deserialize, Serialize};

/// A paragraph or character style definition.
///
/// Attributes are sparse: unset fields inherit through the `based_on` chain,
/// resolved at AST build time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleDef {
    /// Style reference id (e.g. `ParagraphStyle/Body`)
    pub self_ref: String,

    /// Human-readable style name
    pub name: Option<String>,

    /// Parent style reference (may be unprefixed)
    pub based_on: Option<String>,

    /// Font family
    pub font_family: Option<String>,

    /// Font size (points)
    pub font_size: Option<f64>,

    /// Fill color reference
    pub fill_color: Option<String>,

    /// Font style (Bold, Italic, ...)
    pub font_style: Option<String>,

    /// Text alignment
    pub text_alignment: Option<String>,

    /// First-line indent (points)
    pub first_line_indent: Option<f64>,

    /// Left indent (points)
    pub left_indent: Option<f64>,

    /// Right indent (points)
    pub right_indent: Option<f64>,

    /// Space before (points)
    pub space_before: Option<f64>,

    /// Space after (points)
    pub space_after: Option<f64>,

    /// Fixed leading (points); unset when leading is automatic
    pub leading: Option<f64>,

    /// Leading type (`Auto` when leading is automatic)
    pub leading_type: Option<String>,

    /// Auto-leading percentage (e.g. 120.0)
    pub auto_leading: Option<f64>,

    /// Letter tracking (1/1000 em)
    pub tracking: Option<f64>,
}

impl StyleDef {
    /// Style name without its `ParagraphStyle/` / `CharacterStyle/` prefix.
    pub fn simple_name(&self) -> &str {
        let full = self.name.as_deref().unwrap_or(&self.self_ref);
        full.rsplit('/').next().unwrap_or(full)
    }
}

/// A font definition from the document's font table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontDef {
    /// Font family name
    pub font_family: String,

    /// Font technology (e.g. `OpenTypeCFF`, `TrueType`)
    pub font_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let style = StyleDef {
            self_ref: "ParagraphStyle/Body".to_string(),
            name: Some("ParagraphStyle/Body".to_string()),
            ..Default::default()
        };
        assert_eq!(style.simple_name(), "Body");

        let bare = StyleDef {
            self_ref: "Heading".to_string(),
            ..Default::default()
        };
        assert_eq!(bare.simple_name(), "Heading");
    }
}
