//! Source table types.

use super::StoryParagraph;
use serde::{Deserialize, Serialize};

/// A table anchored in a story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Unique table id
    pub self_id: String,

    /// Rows in order
    pub rows: Vec<TableRow>,

    /// Column widths (points)
    pub column_widths: Vec<f64>,
}

/// A table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Row height (points)
    pub row_height: f64,

    /// Whether the row grows with its content
    pub auto_grow: bool,

    /// Cells in column order
    pub cells: Vec<TableCell>,
}

/// A table cell: spans, styling, and its own paragraphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Number of rows spanned
    pub row_span: u32,

    /// Number of columns spanned
    pub column_span: u32,

    /// Fill color reference
    pub fill_color: Option<String>,

    /// Vertical justification within the cell
    pub vertical_justification: Option<String>,

    /// Insets `[top, bottom, left, right]` are stored individually (points)
    pub top_inset: f64,
    /// Bottom inset (points)
    pub bottom_inset: f64,
    /// Left inset (points)
    pub left_inset: f64,
    /// Right inset (points)
    pub right_inset: f64,

    /// Top border
    pub top_border: Option<CellBorder>,
    /// Bottom border
    pub bottom_border: Option<CellBorder>,
    /// Left border
    pub left_border: Option<CellBorder>,
    /// Right border
    pub right_border: Option<CellBorder>,

    /// Diagonal from top-left to bottom-right
    pub top_left_diagonal: bool,
    /// Diagonal from top-right to bottom-left
    pub top_right_diagonal: bool,

    /// Cell content paragraphs
    pub paragraphs: Vec<StoryParagraph>,
}

/// Stroke styling of one cell edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellBorder {
    /// Stroke weight (points)
    pub stroke_weight: f64,

    /// Stroke type (Solid, Dashed, Dotted)
    pub stroke_type: Option<String>,

    /// Stroke color reference
    pub stroke_color: Option<String>,

    /// Stroke tint 0..=100
    pub stroke_tint: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_defaults() {
        let table = Table::default();
        assert!(table.rows.is_empty());
        assert!(table.column_widths.is_empty());
    }
}
