//! HNSW insertion.
//!
//! Inserts one vector with bidirectional connections and connection pruning
//! on every node whose degree grew. The walk is top-down: strictly above the
//! sampled target layer only the entry point is refined; at and below it the
//! node is linked into the graph.

use crate::error::{HnswError, Result};
use crate::hnsw::graph::{HnswIndex, LayerNode};
use crate::hnsw::search::search_layer;

impl HnswIndex {
    /// Insert a vector into the index.
    ///
    /// The first insert fixes the index dimensionality; later inserts fail
    /// with [`HnswError::DimensionMismatch`] when their length differs. The
    /// check runs before the level is sampled or any layer is touched, so a
    /// failed insert leaves the index — including its RNG state — unchanged.
    pub fn insert(&mut self, vector: &[f64]) -> Result<()> {
        if let Some(dim) = self.dimension() {
            if dim != vector.len() {
                return Err(HnswError::DimensionMismatch {
                    expected: dim,
                    actual: vector.len(),
                });
            }
        }

        let level = self.sampler.sample();
        let depth = self.layers.len();
        // Storage is top-first: positions >= first_link receive the node.
        let first_link = depth - 1 - level;
        let mut entry = 0usize;

        for pos in 0..depth {
            if self.layers[pos].is_empty() {
                // Only reachable on the first insert, which populates every
                // layer and becomes the persistent entry node at position 0.
                let layer_below = self.below_len(pos);
                self.layers[pos].push(LayerNode {
                    vector: vector.to_vec(),
                    connections: Vec::new(),
                    layer_below,
                });
                continue;
            }

            if pos < first_link {
                let found = search_layer(&self.layers[pos], entry, vector, 1)?;
                if let Some(&(_, best)) = found.first() {
                    match self.layers[pos][best].layer_below {
                        Some(below) => entry = below,
                        None => break,
                    }
                }
            } else {
                let candidates = search_layer(
                    &self.layers[pos],
                    entry,
                    vector,
                    self.config.ef_construction,
                )?;
                let new_idx = self.layers[pos].len();
                let selected: Vec<usize> = candidates
                    .iter()
                    .take(self.config.max_connections)
                    .map(|&(_, i)| i)
                    .collect();

                // The index a node will occupy in the layer below equals that
                // layer's current length: iteration is top-down, so the lower
                // append has not happened yet.
                let layer_below = self.below_len(pos);
                self.layers[pos].push(LayerNode {
                    vector: vector.to_vec(),
                    connections: selected.clone(),
                    layer_below,
                });

                for &j in &selected {
                    if !self.layers[pos][j].connections.contains(&new_idx) {
                        self.layers[pos][j].connections.push(new_idx);
                    }
                    self.prune_connections(pos, j)?;
                }
                self.prune_connections(pos, new_idx)?;

                match self.layers[pos][entry].layer_below {
                    Some(below) => entry = below,
                    None => break,
                }
            }
        }

        tracing::debug!(level, total = self.len(), "inserted vector");
        Ok(())
    }

    fn below_len(&self, pos: usize) -> Option<usize> {
        if pos + 1 < self.layers.len() {
            Some(self.layers[pos + 1].len())
        } else {
            None
        }
    }
}
