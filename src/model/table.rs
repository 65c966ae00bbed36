//! Table AST types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// A positioned table block (fixed units unless noted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Source object id
    pub source_id: String,

    /// X position relative to the page
    pub x: i64,
    /// Y position relative to the page
    pub y: i64,

    /// Paint-order index from the flattener
    pub z_order: u32,

    /// Column widths, one per column
    pub column_widths: Vec<i64>,

    /// Number of rows
    pub row_count: u32,
    /// Number of columns
    pub column_count: u32,

    /// Total table width
    pub width: i64,
    /// Total table height
    pub height: i64,

    /// Rows in order
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Get plain text content of the table, cells joined with tabs.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|c| c.plain_text())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Row index (0-based)
    pub row_index: u32,

    /// Row height (fixed units)
    pub row_height: i64,

    /// Whether the row grows with its content
    pub auto_grow: bool,

    /// Cells in column order
    pub cells: Vec<TableCell>,
}

/// A table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Row index of the cell anchor (0-based)
    pub row_index: u32,
    /// Column index of the cell anchor (0-based)
    pub column_index: u32,

    /// Number of rows spanned
    pub row_span: u32,
    /// Number of columns spanned
    pub column_span: u32,

    /// Cell width (fixed units, spans accumulated)
    pub width: i64,
    /// Cell height (fixed units, spans accumulated)
    pub height: i64,

    /// Fill color (`#RRGGBB`)
    pub fill_color: Option<String>,

    /// Vertical alignment (TopAlign, CenterAlign, BottomAlign)
    pub vertical_align: Option<String>,

    /// Inner margins (fixed units)
    pub margin_top: i64,
    /// Bottom margin
    pub margin_bottom: i64,
    /// Left margin
    pub margin_left: i64,
    /// Right margin
    pub margin_right: i64,

    /// Top border
    pub border_top: Option<CellBorder>,
    /// Bottom border
    pub border_bottom: Option<CellBorder>,
    /// Left border
    pub border_left: Option<CellBorder>,
    /// Right border
    pub border_right: Option<CellBorder>,

    /// Diagonal from top-left to bottom-right
    pub diagonal_top_left: bool,
    /// Diagonal from top-right to bottom-left
    pub diagonal_top_right: bool,

    /// Cell content
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    /// Get plain text content of the cell.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A resolved cell border.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellBorder {
    /// Stroke weight (points)
    pub weight: f64,

    /// Stroke type (Solid, Dashed, Dotted)
    pub stroke_type: Option<String>,

    /// Stroke color (`#RRGGBB`)
    pub color: Option<String>,

    /// Stroke tint 0..=100
    pub tint: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InlineItem, TextRun};

    #[test]
    fn test_table_plain_text() {
        let mut cell_a = TableCell::default();
        let mut para = Paragraph::new();
        para.add_item(InlineItem::Text(TextRun::new("a")));
        cell_a.paragraphs.push(para);

        let mut cell_b = TableCell::default();
        let mut para = Paragraph::new();
        para.add_item(InlineItem::Text(TextRun::new("b")));
        cell_b.paragraphs.push(para);

        let table = Table {
            rows: vec![TableRow {
                cells: vec![cell_a, cell_b],
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(table.plain_text(), "a\tb");
    }
}
