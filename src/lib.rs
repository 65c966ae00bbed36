//! # unidml
//!
//! Normalization of IDML page layouts into a canonical word-processor AST.
//!
//! An IDML document is a page-layout object graph: spreads of absolutely
//! positioned frames, groups, anchored objects, and text that flows through
//! chains of linked frames. Word-processor formats want the opposite shape,
//! a linear story-first tree. This library bridges the two with a fixed
//! four-stage pipeline: flatten the spread hierarchy into an object pool,
//! classify every object as inline or floating, plan how inline objects
//! collapse into their host paragraphs, then build a self-contained AST
//! with all geometry in fixed units and all style inheritance resolved.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unidml::{normalize, IdmlDocument, JsonFormat, NormalizeOptions};
//!
//! fn main() -> unidml::Result<()> {
//!     // The source graph comes from an IDML package loader.
//!     let source = IdmlDocument::new();
//!
//!     let options = NormalizeOptions::default();
//!     let result = normalize(&source, &options)?;
//!     for warning in &result.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!
//!     let json = unidml::to_json(&result.document, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Story-first output**: each story emitted exactly once, at its frame
//!   chain's head
//! - **Inline collapse**: anchored frames, images, and groups become
//!   paragraph-level leaves
//! - **Fixed-point geometry**: 100 units per point, no floats downstream
//! - **Style resolution**: `based_on` chains merged, cycle-safe
//! - **Linked-frame distribution**: capacity-estimated text splitting
//!   across chains
//!
//! What this library deliberately leaves to its callers: parsing the IDML
//! package itself (the [`IdmlDocument`] graph is the input contract),
//! rasterizing design assets (the [`ImageLoader`] trait is the seam), and
//! writing the target word-processor format.

pub mod error;
pub mod geometry;
pub mod idml;
pub mod model;
pub mod normalizer;
pub mod raster;
pub mod textfit;

// Re-export commonly used types
pub use error::{Error, Result};
pub use idml::IdmlDocument;
pub use model::{
    from_json, to_json, Block, Break, Document, Figure, FigureKind, InlineItem, InlineObject,
    InlineObjectKind, JsonFormat, Metadata, PageLayout, Paragraph, Section, TextFrameBlock,
    TextRun,
};
pub use normalizer::{
    normalize, normalize_with_loader, NormalizeOptions, NormalizeResult, ObjectPool,
};
pub use raster::{ImageLoader, LoadedImage, NoopLoader};
pub use textfit::{fit_text, FrameInfo};
