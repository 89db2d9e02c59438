//! Versioned JSON persistence for the HNSW index.
//!
//! The wire format captures all parameters and the full layered adjacency:
//!
//! ```json
//! {
//!   "version": 1,
//!   "L": 5, "mL": 0.62, "efc": 10, "maxConnections": 16,
//!   "index": [
//!     [ { "vector": [..], "connections": [..], "layerBelow": -1 }, .. ],
//!     ..
//!   ]
//! }
//! ```
//!
//! Layers are serialized top-first, matching the in-memory order; a node's
//! `layerBelow` refers to the next inner array, with -1 encoding the
//! bottom-layer sentinel. Loading validates every index against the layer it
//! points into and then prunes each node once, so a round trip through a
//! writer that never enforced the connection cap still yields a
//! well-formed index.
//!
//! Binary serialization is a reserved surface: both directions fail with
//! [`HnswError::NotImplemented`].

use crate::config::FORMAT_VERSION;
use crate::error::{HnswError, Result};
use crate::hnsw::graph::{HnswConfig, HnswIndex, LayerNode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Serialize, Deserialize)]
struct NodeDoc {
    vector: Vec<f64>,
    connections: Vec<usize>,
    #[serde(
        rename = "layerBelow",
        serialize_with = "ser_layer_below",
        deserialize_with = "de_layer_below"
    )]
    layer_below: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexDoc {
    version: u32,
    #[serde(rename = "L")]
    max_layers: usize,
    #[serde(rename = "mL")]
    level_multiplier: f64,
    efc: usize,
    #[serde(rename = "maxConnections")]
    max_connections: usize,
    index: Vec<Vec<NodeDoc>>,
}

fn ser_layer_below<S: Serializer>(value: &Option<usize>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(i) => serializer.serialize_i64(*i as i64),
        None => serializer.serialize_i64(-1),
    }
}

fn de_layer_below<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<usize>, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    match raw {
        -1 => Ok(None),
        i if i >= 0 => Ok(Some(i as usize)),
        other => Err(serde::de::Error::custom(format!(
            "layerBelow must be -1 or non-negative, got {other}"
        ))),
    }
}

impl HnswIndex {
    /// Serialize the full index state to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        let doc = IndexDoc {
            version: FORMAT_VERSION,
            max_layers: self.config.max_layers,
            level_multiplier: self.config.level_multiplier,
            efc: self.config.ef_construction,
            max_connections: self.config.max_connections,
            index: self
                .layers
                .iter()
                .map(|layer| {
                    layer
                        .iter()
                        .map(|node| NodeDoc {
                            vector: node.vector.clone(),
                            connections: node.connections.clone(),
                            layer_below: node.layer_below,
                        })
                        .collect()
                })
                .collect(),
        };
        let out = serde_json::to_string(&doc)?;
        tracing::debug!(nodes = self.len(), bytes = out.len(), "serialized index");
        Ok(out)
    }

    /// Reconstruct an index from a JSON string produced by [`Self::to_json`].
    ///
    /// Fails with [`HnswError::Json`] on malformed input,
    /// [`HnswError::UnsupportedVersion`] for any version other than 1, and
    /// [`HnswError::Schema`] when the parsed structure is inconsistent. The
    /// loaded index is equivalent to the originating one under search; the
    /// level sampler is freshly constructed since the wire format carries no
    /// RNG state.
    pub fn from_json(input: &str) -> Result<Self> {
        let doc: IndexDoc = serde_json::from_str(input)?;

        if doc.version != FORMAT_VERSION {
            return Err(HnswError::UnsupportedVersion(doc.version));
        }
        if doc.max_layers == 0 {
            return Err(HnswError::Schema("L must be positive".to_string()));
        }
        if doc.index.len() != doc.max_layers {
            return Err(HnswError::Schema(format!(
                "index has {} layers, expected L = {}",
                doc.index.len(),
                doc.max_layers
            )));
        }

        let mut dimension: Option<usize> = None;
        for (pos, layer) in doc.index.iter().enumerate() {
            for (idx, node) in layer.iter().enumerate() {
                match dimension {
                    None => dimension = Some(node.vector.len()),
                    Some(dim) if dim != node.vector.len() => {
                        return Err(HnswError::Schema(format!(
                            "node {idx} in layer {pos} has dimension {}, expected {dim}",
                            node.vector.len()
                        )));
                    }
                    Some(_) => {}
                }
                for &c in &node.connections {
                    if c >= layer.len() {
                        return Err(HnswError::Schema(format!(
                            "connection {c} out of range in layer {pos} of size {}",
                            layer.len()
                        )));
                    }
                }
                if let Some(below) = node.layer_below {
                    if pos + 1 >= doc.index.len() {
                        return Err(HnswError::Schema(format!(
                            "node {idx} in the bottom layer has layerBelow {below}"
                        )));
                    }
                    if below >= doc.index[pos + 1].len() {
                        return Err(HnswError::Schema(format!(
                            "layerBelow {below} out of range below layer {pos}"
                        )));
                    }
                }
            }
        }

        let config = HnswConfig {
            max_layers: doc.max_layers,
            level_multiplier: doc.level_multiplier,
            ef_construction: doc.efc,
            max_connections: doc.max_connections,
            seed: 0,
        };
        let mut index = HnswIndex::new(config)?;
        index.layers = doc
            .index
            .into_iter()
            .map(|layer| {
                layer
                    .into_iter()
                    .map(|node| LayerNode {
                        vector: node.vector,
                        connections: node.connections,
                        layer_below: node.layer_below,
                    })
                    .collect()
            })
            .collect();

        // Post-load normalization: enforce the connection cap once so
        // repeated round trips are idempotent even for foreign writers.
        for pos in 0..index.layers.len() {
            for node in 0..index.layers[pos].len() {
                index.prune_connections(pos, node)?;
            }
        }

        tracing::info!(
            layers = index.layers.len(),
            nodes = index.len(),
            "loaded index from JSON"
        );
        Ok(index)
    }

    /// Binary serialization is reserved; always fails with
    /// [`HnswError::NotImplemented`].
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Err(HnswError::NotImplemented("binary serialization"))
    }

    /// Binary deserialization is reserved; always fails with
    /// [`HnswError::NotImplemented`].
    pub fn from_binary(_input: &[u8]) -> Result<Self> {
        Err(HnswError::NotImplemented("binary deserialization"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_index() -> HnswIndex {
        let mut index = HnswIndex::new(HnswConfig {
            seed: 42,
            ..HnswConfig::default()
        })
        .unwrap();
        index.insert(&[1.0, 2.0, 3.0]).unwrap();
        index.insert(&[1.0, 2.0, 3.1]).unwrap();
        index.insert(&[1.1, 2.1, 3.0]).unwrap();
        index
    }

    #[test]
    fn test_json_shape() {
        let json = small_index().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["L"], 5);
        assert_eq!(value["mL"], 0.62);
        assert_eq!(value["efc"], 10);
        assert_eq!(value["maxConnections"], 16);
        let layers = value["index"].as_array().unwrap();
        assert_eq!(layers.len(), 5);
        // Bottom layer holds all three vectors, each with the sentinel
        let bottom = layers[4].as_array().unwrap();
        assert_eq!(bottom.len(), 3);
        for node in bottom {
            assert_eq!(node["layerBelow"], -1);
            assert!(node["vector"].is_array());
            assert!(node["connections"].is_array());
        }
        // Top layer links downward
        assert_eq!(layers[0].as_array().unwrap()[0]["layerBelow"], 0);
    }

    #[test]
    fn test_round_trip_preserves_search() {
        let index = small_index();
        let loaded = HnswIndex::from_json(&index.to_json().unwrap()).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(
            loaded.search(&[1.0, 2.0, 3.0], 1).unwrap(),
            index.search(&[1.0, 2.0, 3.0], 1).unwrap()
        );
        assert_eq!(
            loaded.search(&[1.1, 2.1, 3.1], 3).unwrap(),
            index.search(&[1.1, 2.1, 3.1], 3).unwrap()
        );
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let first = small_index().to_json().unwrap();
        let second = HnswIndex::from_json(&first).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(matches!(
            HnswIndex::from_json("not json at all"),
            Err(HnswError::Json(_))
        ));
        assert!(matches!(
            HnswIndex::from_json(r#"{"version": 1}"#),
            Err(HnswError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_version() {
        let mut value: serde_json::Value =
            serde_json::from_str(&small_index().to_json().unwrap()).unwrap();
        value["version"] = 2.into();
        assert!(matches!(
            HnswIndex::from_json(&value.to_string()),
            Err(HnswError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_from_json_rejects_layer_count_mismatch() {
        let json = r#"{"version":1,"L":3,"mL":0.62,"efc":10,"maxConnections":16,"index":[[]]}"#;
        assert!(matches!(
            HnswIndex::from_json(json),
            Err(HnswError::Schema(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_zero_layers() {
        let json = r#"{"version":1,"L":0,"mL":0.62,"efc":10,"maxConnections":16,"index":[]}"#;
        assert!(matches!(
            HnswIndex::from_json(json),
            Err(HnswError::Schema(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_connection() {
        let json = r#"{"version":1,"L":1,"mL":0.62,"efc":10,"maxConnections":16,
            "index":[[{"vector":[1.0],"connections":[5],"layerBelow":-1}]]}"#;
        assert!(matches!(
            HnswIndex::from_json(json),
            Err(HnswError::Schema(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_layer_below() {
        let json = r#"{"version":1,"L":2,"mL":0.62,"efc":10,"maxConnections":16,
            "index":[[{"vector":[1.0],"connections":[],"layerBelow":3}],
                     [{"vector":[1.0],"connections":[],"layerBelow":-1}]]}"#;
        assert!(matches!(
            HnswIndex::from_json(json),
            Err(HnswError::Schema(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_layer_below_on_bottom() {
        let json = r#"{"version":1,"L":1,"mL":0.62,"efc":10,"maxConnections":16,
            "index":[[{"vector":[1.0],"connections":[],"layerBelow":0}]]}"#;
        assert!(matches!(
            HnswIndex::from_json(json),
            Err(HnswError::Schema(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_ragged_dimensions() {
        let json = r#"{"version":1,"L":1,"mL":0.62,"efc":10,"maxConnections":16,
            "index":[[{"vector":[1.0,2.0],"connections":[],"layerBelow":-1},
                      {"vector":[1.0],"connections":[],"layerBelow":-1}]]}"#;
        assert!(matches!(
            HnswIndex::from_json(json),
            Err(HnswError::Schema(_))
        ));
    }

    #[test]
    fn test_from_json_normalizes_overfull_connections() {
        // A foreign writer that never pruned: node 0 lists every other node,
        // with a duplicate and a self-loop thrown in
        let json = r#"{"version":1,"L":1,"mL":0.62,"efc":10,"maxConnections":2,
            "index":[[
              {"vector":[0.0],"connections":[0,1,2,3,3],"layerBelow":-1},
              {"vector":[1.0],"connections":[0],"layerBelow":-1},
              {"vector":[2.0],"connections":[0],"layerBelow":-1},
              {"vector":[9.0],"connections":[0],"layerBelow":-1}
            ]]}"#;
        let index = HnswIndex::from_json(json).unwrap();
        assert_eq!(index.layers[0][0].connections, vec![1, 2]);
    }

    #[test]
    fn test_binary_not_implemented() {
        let index = small_index();
        assert!(matches!(
            index.to_binary(),
            Err(HnswError::NotImplemented(_))
        ));
        assert!(matches!(
            HnswIndex::from_binary(&[]),
            Err(HnswError::NotImplemented(_))
        ));
    }
}
