//! Global configuration constants for hnswdb.
//!
//! All tuning defaults are defined here as compile-time constants; runtime
//! overrides go through [`crate::hnsw::HnswConfig`].

/// Default number of layers in the HNSW graph.
///
/// Higher values give the search more long-range hops to work with but only
/// pay off once the index holds enough vectors for the upper layers to be
/// meaningfully sparse.
pub const HNSW_DEFAULT_MAX_LAYERS: usize = 5;

/// Default level generation multiplier for layer assignment.
///
/// New nodes are assigned to layer `floor(-ln(uniform) * LEVEL_MULTIPLIER)`,
/// clamped to the layer count. Larger values push more nodes into the upper
/// layers.
pub const HNSW_DEFAULT_LEVEL_MULTIPLIER: f64 = 0.62;

/// Default ef parameter during index construction.
///
/// Controls the size of the dynamic candidate list while discovering
/// neighbors for a newly inserted node. Higher values produce a better graph
/// but slow down build time.
pub const HNSW_DEFAULT_EF_CONSTRUCTION: usize = 10;

/// Default upper bound on out-degree per node within a layer.
pub const HNSW_DEFAULT_MAX_CONNECTIONS: usize = 16;

/// Serialization format version written by `to_json` and accepted by
/// `from_json`.
pub const FORMAT_VERSION: u32 = 1;

/// Default maximum number of entries held by an [`crate::cache::LruCache`].
pub const CACHE_DEFAULT_MAX_SIZE: usize = 10_000;

/// Default maximum entry age for an [`crate::cache::LruCache`], in
/// milliseconds. Zero disables age-based eviction.
pub const CACHE_DEFAULT_MAX_AGE_MS: u64 = 10 * 60 * 1000;
