//! In-memory IDML source document graph.
//!
//! These types describe the read-only object graph handed over by the
//! package-loading collaborator: spreads containing pages and placed frames,
//! stories containing paragraphs and character runs, and the style/font/color
//! tables. The normalizer only ever reads this graph; parsing the IDML
//! package into it is not this crate's concern.

mod document;
mod frame;
mod spread;
mod story;
mod style;
mod table;

pub use document::IdmlDocument;
pub use frame::{link_target, AnchoredPosition, Group, ImageFrame, TextFrame, VectorShape};
pub use spread::{Page, Spread};
pub use story::{CharacterRun, InlineGraphic, Story, StoryParagraph};
pub use style::{FontDef, StyleDef};
pub use table::{CellBorder, Table, TableCell, TableRow};
