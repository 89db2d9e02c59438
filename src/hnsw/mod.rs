//! Hierarchical Navigable Small World (HNSW) approximate nearest neighbor
//! index.
//!
//! Vectors are stored by value in a stack of layers; the topmost layer is
//! the sparsest and provides long-range jumps, the bottom layer holds every
//! inserted vector. Node-to-node references within a layer are positional
//! indices, never pointers, which keeps the graph cycle-safe and makes the
//! whole structure trivially serializable.
//!
//! All internal distance comparisons use squared Euclidean distance; the
//! square root is applied only when producing user-facing search results.

/// Euclidean distance (squared and true) plus a cosine similarity helper.
pub mod distance;
/// Graph structure, configuration, and connection pruning.
pub mod graph;
/// Insertion: top-down descent with bidirectional neighbor linking.
pub mod insert;
/// Seeded per-instance layer assignment sampler.
pub mod level;
/// Versioned JSON persistence; binary format reserved.
pub mod persistence;
/// Bounded best-set and candidate frontier used by layer search.
pub mod queue;
/// Layer search: greedy-plus-beam traversal shared by query and construction.
pub mod search;
/// Per-call visited marker for graph traversal.
pub mod visited;

pub use graph::{HnswConfig, HnswIndex, Layer, LayerNode};
pub use search::search_layer;
