//! Error types for hnswdb.

use thiserror::Error;

/// Result type alias for hnswdb operations.
pub type Result<T> = std::result::Result<T, HnswError>;

/// Errors surfaced by index construction, mutation, search, and
/// serialization.
///
/// Operations leave the index untouched when they fail; insertion in
/// particular validates its input before mutating any state.
#[derive(Debug, Error)]
pub enum HnswError {
    /// Vector arithmetic between unequal-length vectors.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the vector already stored (or given first).
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },

    /// Entry node index out of range for a layer search.
    #[error("invalid entry index: {entry} >= layer size {len}")]
    InvalidEntry {
        /// The entry index that was out of range.
        entry: usize,
        /// The number of nodes in the layer.
        len: usize,
    },

    /// Bad construction parameter (e.g. zero layers).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Serialized input could not be parsed as JSON of the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed input is structurally inconsistent (bad indices, ragged
    /// dimensions, wrong layer count).
    #[error("schema violation: {0}")]
    Schema(String),

    /// Serialized input declares a format version this reader does not
    /// implement.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),

    /// Reserved surface with no implementation behind it.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}
