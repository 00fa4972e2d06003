//! Generalization/specialization lattice.
//!
//! Starting from a seed subgraph, repeatedly remove single edges (keeping only
//! connected results) until nothing is left to remove. Every distinct result,
//! keyed by [`SubGraph::short_label`], becomes a node; nodes are then linked to
//! the nodes they grow into by adding one edge from the parent graph.
//!
//! ```text
//!   seed ──remove edge──► generalizations ──► ... ──► single vertices
//!     ▲                        │
//!     └──── specializes-to ────┘
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::canonical::canonical_hash_hex;
use crate::config::LatticeConfig;
use crate::subgraph::{SubGraph, SubGraphError};
use crate::types::Link;

/// DAG of structurally distinct subgraphs.
///
/// `nodes[0]` is the seed; later nodes are more general. Each arc points from
/// a node to a strictly more specific node (one more edge).
#[derive(Debug, Clone)]
pub struct Lattice<'g> {
    nodes: Vec<SubGraph<'g>>,
    arcs: Vec<Link>,
}

/// One lattice node in a [`LatticeSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeNodeSummary {
    /// Compact canonical label.
    pub label: String,
    /// Hex fingerprint of the short label.
    pub fingerprint: String,
    /// Number of vertices.
    pub vertices: usize,
    /// Number of edges.
    pub edges: usize,
}

/// Serializable view of a [`Lattice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeSummary {
    /// Hash over nodes and arcs.
    pub lattice_id: String,
    /// Nodes in lattice order.
    pub nodes: Vec<LatticeNodeSummary>,
    /// `(general, specific)` node index pairs.
    pub arcs: Vec<(usize, usize)>,
}

#[derive(Serialize)]
struct LatticeIdInput<'a> {
    fingerprints: Vec<&'a str>,
    arcs: &'a [(usize, usize)],
}

impl<'g> Lattice<'g> {
    /// Nodes, seed first.
    pub fn nodes(&self) -> &[SubGraph<'g>] {
        &self.nodes
    }

    /// Specialization arcs between node indices.
    pub fn arcs(&self) -> &[Link] {
        &self.arcs
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of the nodes `idx` specializes to.
    pub fn specializations_of(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.arcs.iter().filter(move |a| a.src == idx).map(|a| a.targ)
    }

    /// Indices of the nodes `idx` generalizes to.
    pub fn generalizations_of(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.arcs.iter().filter(move |a| a.targ == idx).map(|a| a.src)
    }

    /// Serializable summary.
    pub fn summary(&self) -> Result<LatticeSummary, serde_json::Error> {
        let nodes: Vec<LatticeNodeSummary> = self
            .nodes
            .iter()
            .map(|sg| LatticeNodeSummary {
                label: sg.label(),
                fingerprint: sg.fingerprint_hex(),
                vertices: sg.vertices().len(),
                edges: sg.edges().len(),
            })
            .collect();
        let arcs: Vec<(usize, usize)> = self.arcs.iter().map(|a| (a.src, a.targ)).collect();
        let lattice_id = canonical_hash_hex(&LatticeIdInput {
            fingerprints: nodes.iter().map(|n| n.fingerprint.as_str()).collect(),
            arcs: &arcs,
        })?;
        Ok(LatticeSummary {
            lattice_id,
            nodes,
            arcs,
        })
    }

    /// Summary as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.summary()?)
    }
}

fn push_unique<'g>(seen: &mut HashSet<Vec<u8>>, out: &mut Vec<SubGraph<'g>>, sg: SubGraph<'g>) {
    if seen.insert(sg.short_label()) {
        out.push(sg);
    }
}

impl<'g> SubGraph<'g> {
    /// Distinct connected subgraphs reachable by removing exactly one edge.
    ///
    /// A single edge between two vertices generalizes to both endpoints on
    /// their own; a lone self-loop generalizes to its vertex.
    pub fn generalizations(&self) -> Result<Vec<SubGraph<'g>>, SubGraphError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let graph = self.graph();

        match (self.vertices().len(), self.edges().len()) {
            (_, 0) => {}
            (2, 1) => {
                let e = self.edges()[0];
                for endpoint in [e.src(), e.targ()] {
                    let (sg, _) = graph.subgraph(&[self.vertices()[endpoint].id], &[])?;
                    push_unique(&mut seen, &mut out, sg);
                }
            }
            (1, 1) => {
                let (sg, _) = graph.subgraph(&[self.vertices()[0].id], &[])?;
                push_unique(&mut seen, &mut out, sg);
            }
            (_, edges) => {
                for idx in 0..edges {
                    match self.remove_edge(idx) {
                        Ok(sg) if sg.connected() => push_unique(&mut seen, &mut out, sg),
                        Ok(_) => {}
                        // an isolated edge; what remains is disconnected anyway
                        Err(SubGraphError::WouldOrphanBoth(_)) => {
                            trace!(edge = idx, "skipping removal of isolated edge");
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Ok(out)
    }

    /// Distinct subgraphs reachable by adding one parent-graph edge incident
    /// to a member vertex.
    pub fn specializations(&self) -> Result<Vec<SubGraph<'g>>, SubGraphError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let graph = self.graph();

        for v in self.vertices() {
            for e in graph.kids(v.id).chain(graph.parents(v.id)) {
                if self.has_edge(&e.colored_link()) {
                    continue;
                }
                push_unique(&mut seen, &mut out, self.edge_extend(e)?);
            }
        }
        Ok(out)
    }

    /// Build the lattice rooted at this subgraph with default limits.
    pub fn lattice(&self) -> Result<Lattice<'g>, SubGraphError> {
        self.lattice_with_config(&LatticeConfig::default())
    }

    /// Build the lattice rooted at this subgraph.
    ///
    /// Nodes come out in breadth-first discovery order of the generalization
    /// search, so the seed is first and every node appears after the nodes it
    /// specializes to.
    pub fn lattice_with_config(&self, config: &LatticeConfig) -> Result<Lattice<'g>, SubGraphError> {
        let mut nodes: Vec<SubGraph<'g>> = Vec::new();
        let mut index: HashMap<Vec<u8>, usize> = HashMap::new();
        let mut queued: HashSet<Vec<u8>> = HashSet::new();
        let mut queue: VecDeque<SubGraph<'g>> = VecDeque::new();

        queued.insert(self.short_label());
        queue.push_back(self.clone());
        while let Some(sg) = queue.pop_front() {
            if nodes.len() >= config.max_nodes {
                return Err(SubGraphError::LatticeBudgetExceeded {
                    limit: config.max_nodes,
                });
            }
            for parent in sg.generalizations()? {
                if queued.insert(parent.short_label()) {
                    queue.push_back(parent);
                }
            }
            index.insert(sg.short_label(), nodes.len());
            nodes.push(sg);
        }

        let mut arcs = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            for kid in node.specializations()? {
                if let Some(&j) = index.get(&kid.short_label()) {
                    arcs.push(Link::new(i, j));
                }
            }
        }

        debug!(
            nodes = nodes.len(),
            arcs = arcs.len(),
            seed_edges = self.edges().len(),
            "lattice built"
        );
        Ok(Lattice { nodes, arcs })
    }
}
