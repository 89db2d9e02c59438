//! # hnswdb
//!
//! Embeddable in-memory approximate nearest neighbor index for dense f64
//! vectors under Euclidean distance, organized as a Hierarchical Navigable
//! Small World (HNSW) graph.
//!
//! The index supports incremental insertion, top-k queries, and lossless
//! round-trip JSON serialization of the complete graph state. It is a plain
//! synchronous library with zero async dependencies — suitable for embedding
//! directly in Rust services or behind language bindings.

/// LRU cache with max-size and max-age eviction. Standalone facility; the
/// HNSW index does not depend on it.
pub mod cache;
/// Global configuration constants: defaults and format version.
pub mod config;
/// Error enum and `Result` alias shared by all operations.
pub mod error;
/// HNSW approximate nearest neighbor index: graph structure, search,
/// insertion, distance functions, and JSON persistence.
pub mod hnsw;
