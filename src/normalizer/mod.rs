//! The normalization pipeline: source graph in, canonical AST out.
//!
//! Four stages run in a fixed order:
//!
//! 1. **Flatten**: every placed object of every spread enters a single
//!    pool with absolute geometry, page assignment, and a document-wide
//!    paint order ([`flatten`]).
//! 2. **Classify**: objects referenced from story text (or anchored
//!    without a resolved story) are marked inline; everything else stays
//!    floating ([`classify`]).
//! 3. **Collapse planning**: each inline object gets a strategy for how
//!    it becomes a paragraph-level leaf ([`prepare_collapse`]).
//! 4. **Build**: pages become sections, stories become blocks at their
//!    chain heads, the plan is executed, and style inheritance is resolved
//!    into a self-contained tree.
//!
//! Content problems never abort the pipeline: structural gaps are skipped
//! with a debug log, asset failures are recorded as warnings on the
//! result.

mod builder;
mod classify;
mod collapse;
mod flatten;
mod options;
mod pool;

pub use classify::classify;
pub use collapse::{prepare_collapse, CollapsePlan, CollapseStrategy};
pub use flatten::flatten;
pub use options::NormalizeOptions;
pub use pool::{ContentType, FlatObject, InlineAnchor, ObjectPool};

use crate::error::Result;
use crate::idml::IdmlDocument;
use crate::model::Document;
use crate::raster::{ImageLoader, NoopLoader};

/// The outcome of a normalization run.
#[derive(Debug)]
pub struct NormalizeResult {
    /// The normalized document
    pub document: Document,

    /// Non-fatal problems encountered along the way
    pub warnings: Vec<String>,
}

/// Normalize a source document without loading image payloads from disk.
///
/// Figures and inline images still appear in the AST with their geometry
/// and source paths; only the raster bytes are absent.
pub fn normalize(source: &IdmlDocument, options: &NormalizeOptions) -> Result<NormalizeResult> {
    normalize_with_loader(source, options, &NoopLoader)
}

/// Normalize a source document, resolving image assets through `loader`.
pub fn normalize_with_loader(
    source: &IdmlDocument,
    options: &NormalizeOptions,
    loader: &dyn ImageLoader,
) -> Result<NormalizeResult> {
    let mut warnings = Vec::new();

    let pool = flatten(source);
    let pool = classify(pool, source);
    let plan = prepare_collapse(&pool, &mut warnings);
    let document = builder::build(source, &pool, &plan, options, loader, &mut warnings);

    log::debug!(
        "normalized {} pages, {} warnings",
        document.section_count(),
        warnings.len()
    );
    Ok(NormalizeResult { document, warnings })
}
