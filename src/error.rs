//! Error types for the unidml library.

use std::io;
use thiserror::Error;

/// Result type alias for unidml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during normalization.
///
/// Per-object problems (missing geometry, unresolvable styles, failed image
/// loads) never surface here; they are skipped or reported through the
/// warnings channel of [`crate::normalizer::NormalizeResult`]. Only
/// document-level failures are fatal.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source document could not be loaded at all.
    #[error("Source document load error: {0}")]
    SourceLoad(String),

    /// The source document contains no spreads.
    #[error("Source document is empty")]
    EmptyDocument,

    /// Error serializing or deserializing the AST.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Other errors.
    #[error("{0}")]
    Other(String),
}
