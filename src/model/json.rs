//! JSON serialization for the normalized document.

use super::Document;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// JSON output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonFormat {
    /// Human-readable, indented
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Serialize a document to JSON.
///
/// Binary payloads (raster data) are skipped; the JSON tree carries
/// formats, dimensions, and source paths instead.
pub fn to_json(document: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(document),
        JsonFormat::Compact => serde_json::to_string(document),
    };
    result.map_err(|e| Error::Serialize(e.to_string()))
}

/// Deserialize a document from JSON.
///
/// Skipped binary fields come back empty.
pub fn from_json(json: &str) -> Result<Document> {
    serde_json::from_str(json).map_err(|e| Error::Serialize(e.to_string()))
}
