//! HNSW graph structure and configuration.
//!
//! [`HnswConfig`] defines tuning parameters (layer count, level multiplier,
//! ef_construction, max_connections, seed). [`HnswIndex`] stores the layered
//! graph; layers are kept top-first, the same order as the serialized form,
//! so storage position 0 is the sparsest layer and the last position is the
//! bottom layer holding every vector.

use crate::config;
use crate::error::{HnswError, Result};
use crate::hnsw::distance::squared_euclidean;
use crate::hnsw::level::LevelSampler;
use ordered_float::OrderedFloat;

/// Configuration parameters for an HNSW index.
///
/// Controls the trade-off between build speed, search quality, and memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HnswConfig {
    /// Number of layers in the graph. Must be at least 1.
    pub max_layers: usize,
    /// Level generation multiplier; larger values push more nodes into the
    /// upper layers.
    pub level_multiplier: f64,
    /// Candidate list size during construction.
    pub ef_construction: usize,
    /// Upper bound on out-degree per node within a layer.
    pub max_connections: usize,
    /// RNG seed for level assignment. 0 selects a non-deterministic source.
    pub seed: u64,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            max_layers: config::HNSW_DEFAULT_MAX_LAYERS,
            level_multiplier: config::HNSW_DEFAULT_LEVEL_MULTIPLIER,
            ef_construction: config::HNSW_DEFAULT_EF_CONSTRUCTION,
            max_connections: config::HNSW_DEFAULT_MAX_CONNECTIONS,
            seed: 0,
        }
    }
}

/// One stored vector within a layer, its intra-layer adjacency, and the
/// index of the same vector's node in the layer below (`None` on the bottom
/// layer).
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    pub vector: Vec<f64>,
    pub connections: Vec<usize>,
    pub layer_below: Option<usize>,
}

/// One level of the hierarchy. A node's identity is its position; positions
/// are assigned monotonically and never reused.
pub type Layer = Vec<LayerNode>;

/// In-memory HNSW index.
///
/// Single-threaded for mutation: `insert` must not run concurrently with
/// anything else. `search` takes `&self` and may run from multiple threads
/// as long as no insert is in flight; callers wanting multi-reader /
/// single-writer semantics should wrap the index in a readers-writer lock.
#[derive(Debug)]
pub struct HnswIndex {
    pub config: HnswConfig,
    /// Layers stored top-first: `layers[0]` is the sparsest layer,
    /// `layers[max_layers - 1]` is the bottom layer.
    pub layers: Vec<Layer>,
    pub(crate) sampler: LevelSampler,
}

impl HnswIndex {
    /// Creates an empty index with the given configuration.
    ///
    /// Fails with [`HnswError::InvalidParameter`] when `max_layers` is zero.
    pub fn new(config: HnswConfig) -> Result<Self> {
        if config.max_layers == 0 {
            return Err(HnswError::InvalidParameter(
                "max_layers must be positive".to_string(),
            ));
        }
        let sampler = LevelSampler::new(
            config.max_layers - 1,
            config.level_multiplier,
            config.seed,
        );
        Ok(Self {
            layers: vec![Vec::new(); config.max_layers],
            config,
            sampler,
        })
    }

    /// Creates an empty index with default configuration (5 layers,
    /// mL=0.62, efc=10, M=16, non-deterministic seed).
    pub fn with_defaults() -> Self {
        Self::new(HnswConfig::default()).expect("default config is valid")
    }

    /// Number of inserted vectors. The bottom layer holds every vector
    /// exactly once.
    pub fn len(&self) -> usize {
        self.layers.last().map_or(0, Vec::len)
    }

    /// Returns `true` if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality fixed by the first insert, or `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .map(|node| node.vector.len())
    }

    /// Recompute a node's connections as the `max_connections` nearest by
    /// squared distance among the current set.
    ///
    /// Self-loops, duplicates, and out-of-range indices are dropped first.
    /// A partial selection isolates the top-M, which are then sorted
    /// ascending by `(distance, index)` so connection lists have one
    /// canonical order.
    pub(crate) fn prune_connections(&mut self, layer_idx: usize, node_idx: usize) -> Result<()> {
        let cap = self.config.max_connections;
        let layer = &self.layers[layer_idx];
        let node = &layer[node_idx];

        let mut candidates: Vec<usize> = node
            .connections
            .iter()
            .copied()
            .filter(|&c| c != node_idx && c < layer.len())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let mut scored: Vec<(OrderedFloat<f64>, usize)> = Vec::with_capacity(candidates.len());
        for c in candidates {
            let dist = squared_euclidean(&node.vector, &layer[c].vector)?;
            scored.push((OrderedFloat(dist), c));
        }

        if cap == 0 {
            scored.clear();
        } else if scored.len() > cap {
            scored.select_nth_unstable(cap - 1);
            scored.truncate(cap);
        }
        scored.sort_unstable();

        self.layers[layer_idx][node_idx].connections =
            scored.into_iter().map(|(_, c)| c).collect();
        Ok(())
    }
}
