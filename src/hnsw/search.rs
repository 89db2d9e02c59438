//! HNSW search: single-layer beam search and multi-layer KNN.
//!
//! [`search_layer`] is the shared traversal primitive: queries and insertion
//! both use it, the former with the caller's `ef` on the bottom layer, the
//! latter with `ef_construction` while discovering neighbors. All distances
//! inside the traversal are squared; [`HnswIndex::search`] converts to true
//! Euclidean distance at the boundary.

use crate::error::{HnswError, Result};
use crate::hnsw::distance::squared_euclidean;
use crate::hnsw::graph::{HnswIndex, LayerNode};
use crate::hnsw::queue::{Frontier, NearestSet};
use crate::hnsw::visited::VisitedSet;

/// Search a single layer for the `ef` nodes closest to `query`.
///
/// Returns `(squared distance, node index)` pairs sorted ascending by
/// distance, ties broken by index. An empty layer or `ef == 0` yields an
/// empty result; an out-of-range entry fails with
/// [`HnswError::InvalidEntry`]. Out-of-range neighbor indices encountered
/// during traversal are skipped: the insert path never produces them, but
/// deserialized input is external and queries stay robust against it.
pub fn search_layer(
    layer: &[LayerNode],
    entry: usize,
    query: &[f64],
    ef: usize,
) -> Result<Vec<(f64, usize)>> {
    if layer.is_empty() || ef == 0 {
        return Ok(Vec::new());
    }
    if entry >= layer.len() {
        return Err(HnswError::InvalidEntry {
            entry,
            len: layer.len(),
        });
    }

    let mut visited = VisitedSet::new(layer.len());
    visited.mark(entry);

    let entry_dist = squared_euclidean(&layer[entry].vector, query)?;
    let mut nearest = NearestSet::new(ef);
    nearest.try_insert(entry_dist, entry);
    let mut frontier = Frontier::new();
    frontier.push(entry_dist, entry);

    while let Some((dist, node)) = frontier.pop() {
        if nearest.is_full() && dist > nearest.worst_dist() {
            break;
        }
        for &neighbor in &layer[node].connections {
            if neighbor >= layer.len() {
                continue;
            }
            if !visited.mark(neighbor) {
                continue;
            }
            let d = squared_euclidean(&layer[neighbor].vector, query)?;
            if !nearest.is_full() || d < nearest.worst_dist() {
                frontier.push(d, neighbor);
                nearest.try_insert(d, neighbor);
            }
        }
    }

    Ok(nearest.into_sorted())
}

impl HnswIndex {
    /// Find the `ef` approximate nearest neighbors of `query`.
    ///
    /// Descends from the top layer with a width-1 search per layer to refine
    /// the entry point, then runs an `ef`-wide search on the bottom layer.
    /// Returns `(Euclidean distance, node index)` pairs sorted ascending by
    /// distance. An empty index or `ef == 0` yields an empty result; fewer
    /// than `ef` results are returned when the index holds fewer vectors.
    pub fn search(&self, query: &[f64], ef: usize) -> Result<Vec<(f64, usize)>> {
        let bottom = self.layers.len() - 1;
        if self.layers[bottom].is_empty() {
            return Ok(Vec::new());
        }

        let mut entry = 0usize;
        for pos in 0..bottom {
            let layer = &self.layers[pos];
            if layer.is_empty() {
                continue;
            }
            let found = search_layer(layer, entry, query, 1)?;
            if let Some(&(_, best)) = found.first() {
                match layer[best].layer_below {
                    Some(below) => entry = below,
                    // Sentinel above the bottom layer: only possible on
                    // imported graphs. The best hit seeds the bottom search.
                    None => {
                        entry = best;
                        break;
                    }
                }
            }
        }

        let hits = search_layer(&self.layers[bottom], entry, query, ef)?;
        Ok(hits.into_iter().map(|(d, i)| (d.sqrt(), i)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hnsw::graph::HnswConfig;

    fn node(vector: Vec<f64>, connections: Vec<usize>) -> LayerNode {
        LayerNode {
            vector,
            connections,
            layer_below: None,
        }
    }

    /// A 1-d chain 0 - 1 - 2 - 3 with coordinates 0, 1, 2, 3.
    fn chain() -> Vec<LayerNode> {
        vec![
            node(vec![0.0], vec![1]),
            node(vec![1.0], vec![0, 2]),
            node(vec![2.0], vec![1, 3]),
            node(vec![3.0], vec![2]),
        ]
    }

    #[test]
    fn test_search_layer_empty_graph() {
        let layer: Vec<LayerNode> = Vec::new();
        assert_eq!(search_layer(&layer, 0, &[1.0], 3).unwrap(), vec![]);
    }

    #[test]
    fn test_search_layer_zero_ef() {
        assert_eq!(search_layer(&chain(), 0, &[1.0], 0).unwrap(), vec![]);
    }

    #[test]
    fn test_search_layer_invalid_entry() {
        let err = search_layer(&chain(), 9, &[1.0], 1).unwrap_err();
        assert!(matches!(err, HnswError::InvalidEntry { entry: 9, len: 4 }));
    }

    #[test]
    fn test_search_layer_walks_to_target() {
        // Start at the far end; the beam must walk the chain to reach 3.0
        let result = search_layer(&chain(), 0, &[3.0], 1).unwrap();
        assert_eq!(result, vec![(0.0, 3)]);
    }

    #[test]
    fn test_search_layer_returns_ef_sorted() {
        let result = search_layer(&chain(), 0, &[0.2], 3).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].1, 0);
        for pair in result.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
    }

    #[test]
    fn test_search_layer_skips_out_of_range_neighbors() {
        let layer = vec![node(vec![0.0], vec![1, 42]), node(vec![1.0], vec![0])];
        let result = search_layer(&layer, 0, &[1.0], 2).unwrap();
        assert_eq!(result, vec![(0.0, 1), (1.0, 0)]);
    }

    #[test]
    fn test_search_layer_dimension_mismatch() {
        let err = search_layer(&chain(), 0, &[1.0, 2.0], 1).unwrap_err();
        assert!(matches!(err, HnswError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_search_empty_index() {
        let index = HnswIndex::with_defaults();
        assert_eq!(index.search(&[0.0], 1).unwrap(), vec![]);
    }

    #[test]
    fn test_search_single_layer_index() {
        let mut index = HnswIndex::new(HnswConfig {
            max_layers: 1,
            seed: 3,
            ..HnswConfig::default()
        })
        .unwrap();
        index.insert(&[0.0, 0.0]).unwrap();
        index.insert(&[3.0, 4.0]).unwrap();
        let result = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(result, vec![(0.0, 0), (5.0, 1)]);
    }

    #[test]
    fn test_search_returns_true_distance() {
        let mut index = HnswIndex::with_defaults();
        index.insert(&[0.0, 0.0]).unwrap();
        let result = index.search(&[3.0, 4.0], 1).unwrap();
        assert_eq!(result, vec![(5.0, 0)]);
    }
}
