//! Tunables for lattice construction.
//!
//! Deserializes from partial JSON: missing fields take their defaults.

use serde::{Deserialize, Serialize};

/// Default cap on lattice nodes.
pub const DEFAULT_MAX_LATTICE_NODES: usize = 1 << 16;

/// Configuration for [`SubGraph::lattice_with_config`](crate::SubGraph::lattice_with_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Maximum number of distinct nodes before construction aborts.
    pub max_nodes: usize,
}

impl LatticeConfig {
    /// Load from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_LATTICE_NODES,
        }
    }
}
