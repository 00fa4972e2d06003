//! Induced, always-canonical subgraphs.
//!
//! A [`SubGraph`] is a compact copy of some vertices of a [`Graph`] and the
//! edges between them, stored in canonical order. Every operation that changes
//! membership returns a new `SubGraph`; none mutate in place.
//!
//! Vertex ids inside a `SubGraph` are indices into the parent graph's vertex
//! array, which makes the embedding recoverable.
//!
//! ## Canonical order
//!
//! With at least two vertices or one edge the order comes from the oracle via
//! [`crate::incidence`]. A lone vertex (or nothing) is canonical as is.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::canonical::fingerprint;
use crate::graph::Graph;
use crate::incidence::canonical_order;
use crate::oracle::OracleError;
use crate::types::{Color, ColoredLink, Edge, Link, Vertex};

/// Error type for subgraph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubGraphError {
    /// A vertex id is not an index of the parent graph.
    #[error("vertex {0} is not in the parent graph")]
    UnknownVertex(usize),
    /// Neither endpoint of an extension edge is a member.
    #[error("edge {src}->{targ} touches no member vertex")]
    DetachedEdge {
        /// Parent-graph source index.
        src: usize,
        /// Parent-graph target index.
        targ: usize,
    },
    /// An edge index is past the end of the edge array.
    #[error("edge index {idx} out of range ({edges} edges)")]
    EdgeOutOfRange {
        /// Requested index.
        idx: usize,
        /// Number of edges.
        edges: usize,
    },
    /// Removing the edge would leave both endpoints without edges.
    #[error("removing edge {0} would orphan both of its endpoints")]
    WouldOrphanBoth(usize),
    /// Lattice construction found more nodes than allowed.
    #[error("lattice exceeded {limit} nodes")]
    LatticeBudgetExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// The canonicalization oracle failed.
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),
}

/// Canonically ordered induced subgraph of a [`Graph`].
#[derive(Clone)]
pub struct SubGraph<'g> {
    graph: &'g Graph,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    kids: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
    vertex_index: HashMap<usize, usize>,
    edge_index: HashMap<ColoredLink, usize>,
}

impl Graph {
    /// Induce a canonical subgraph over the parent vertex indices `vids`,
    /// keeping every edge between them whose label is not in
    /// `filtered_edge_labels`.
    ///
    /// The flag is true if the induced order was already canonical.
    /// Repeated ids are taken once.
    pub fn subgraph(
        &self,
        vids: &[usize],
        filtered_edge_labels: &[&str],
    ) -> Result<(SubGraph<'_>, bool), SubGraphError> {
        let filtered = self.resolve_labels(filtered_edge_labels);
        let vertices = find_vertices(self, vids)?;
        let edges = find_edges(self, &vertices, &filtered);
        SubGraph::canonicalize(self, vertices, edges)
    }
}

fn find_vertices(graph: &Graph, vids: &[usize]) -> Result<Vec<Vertex>, SubGraphError> {
    let mut seen = HashSet::with_capacity(vids.len());
    let mut vertices = Vec::with_capacity(vids.len());
    for &vid in vids {
        let v = graph.vertex(vid).ok_or(SubGraphError::UnknownVertex(vid))?;
        if !seen.insert(vid) {
            continue;
        }
        vertices.push(Vertex {
            idx: vertices.len(),
            id: vid,
            color: v.color,
        });
    }
    Ok(vertices)
}

fn find_edges(graph: &Graph, vertices: &[Vertex], filtered: &HashSet<Color>) -> Vec<Edge> {
    let local: HashMap<usize, usize> = vertices.iter().map(|v| (v.id, v.idx)).collect();
    let mut edges = Vec::with_capacity(vertices.len());
    for v in vertices {
        for e in graph.kids(v.id) {
            if filtered.contains(&e.color) {
                continue;
            }
            if let Some(&targ) = local.get(&e.targ()) {
                edges.push(e.copy_to(edges.len(), v.idx, targ));
            }
        }
    }
    edges
}

impl<'g> SubGraph<'g> {
    /// Put `vertices`/`edges` (local indices) into canonical order.
    pub(crate) fn canonicalize(
        graph: &'g Graph,
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
    ) -> Result<(Self, bool), SubGraphError> {
        let order = canonical_order(&vertices, &edges, graph.oracle())?;
        if order.canonized {
            return Ok((Self::assemble(graph, vertices, edges), true));
        }

        let mut canon_v = vertices.clone();
        for (i, &j) in order.vord.iter().enumerate() {
            canon_v[j] = vertices[i].copy_to(j);
        }
        let mut canon_e = edges.clone();
        for (i, &j) in order.eord.iter().enumerate() {
            let e = &edges[i];
            canon_e[j] = e.copy_to(j, order.vord[e.src()], order.vord[e.targ()]);
        }

        debug!(
            vertices = canon_v.len(),
            edges = canon_e.len(),
            "subgraph canonicalized"
        );
        Ok((Self::assemble(graph, canon_v, canon_e), false))
    }

    /// Build adjacency and lookup indices for arrays already in final order.
    pub(crate) fn assemble(graph: &'g Graph, vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        let mut kids = vec![Vec::new(); vertices.len()];
        let mut parents = vec![Vec::new(); vertices.len()];
        let mut edge_index = HashMap::with_capacity(edges.len());
        for e in &edges {
            kids[e.src()].push(e.idx);
            parents[e.targ()].push(e.idx);
            let key = ColoredLink::new(vertices[e.src()].id, vertices[e.targ()].id, e.color);
            edge_index.insert(key, e.idx);
        }
        let vertex_index = vertices.iter().map(|v| (v.id, v.idx)).collect();
        Self {
            graph,
            vertices,
            edges,
            kids,
            parents,
            vertex_index,
            edge_index,
        }
    }

    /// The parent graph.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Vertices in canonical order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Edges in canonical order, endpoints as local indices.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of local vertex `idx`.
    pub fn kids(&self, idx: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.kids
            .get(idx)
            .into_iter()
            .flatten()
            .map(move |&e| &self.edges[e])
    }

    /// Incoming edges of local vertex `idx`.
    pub fn parents(&self, idx: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.parents
            .get(idx)
            .into_iter()
            .flatten()
            .map(move |&e| &self.edges[e])
    }

    /// Whether parent vertex `id` is a member.
    pub fn has_vertex(&self, id: usize) -> bool {
        self.vertex_index.contains_key(&id)
    }

    /// Whether an edge with these parent endpoints and color is a member.
    pub fn has_edge(&self, link: &ColoredLink) -> bool {
        self.edge_index.contains_key(link)
    }

    /// Local vertex for parent vertex `id`.
    pub fn vertex_by_id(&self, id: usize) -> Option<&Vertex> {
        self.vertex_index.get(&id).map(|&idx| &self.vertices[idx])
    }

    /// Local edge for parent endpoints and color.
    pub fn edge_by_link(&self, link: &ColoredLink) -> Option<&Edge> {
        self.edge_index.get(link).map(|&idx| &self.edges[idx])
    }

    /// Parent vertex ids in canonical order.
    pub fn vertex_ids(&self) -> Vec<usize> {
        self.vertices.iter().map(|v| v.id).collect()
    }

    /// A new subgraph over the members plus `vids`, with every parent edge
    /// between them.
    pub fn extend(&self, vids: &[usize]) -> Result<SubGraph<'g>, SubGraphError> {
        let mut ids = self.vertex_ids();
        ids.extend_from_slice(vids);
        let (sg, _) = self.graph.subgraph(&ids, &[])?;
        Ok(sg)
    }

    /// A new subgraph with one more edge. `edge` is a parent-graph edge; at
    /// least one endpoint must be a member, the other is added if missing.
    pub fn edge_extend(&self, edge: &Edge) -> Result<SubGraph<'g>, SubGraphError> {
        let src = self.vertex_index.get(&edge.src()).copied();
        let targ = self.vertex_index.get(&edge.targ()).copied();
        if src.is_none() && targ.is_none() {
            return Err(SubGraphError::DetachedEdge {
                src: edge.src(),
                targ: edge.targ(),
            });
        }

        let mut ids = self.vertex_ids();
        let targ = targ.unwrap_or_else(|| {
            ids.push(edge.targ());
            ids.len() - 1
        });
        let src = src.unwrap_or_else(|| {
            ids.push(edge.src());
            ids.len() - 1
        });

        let vertices = find_vertices(self.graph, &ids)?;
        let mut edges = self.edges.clone();
        edges.push(Edge {
            link: Link::new(src, targ),
            idx: edges.len(),
            color: edge.color,
        });
        let (sg, _) = Self::canonicalize(self.graph, vertices, edges)?;
        Ok(sg)
    }

    /// A new subgraph without edge `edge_idx`. An endpoint left with no edges
    /// is dropped too; if both would be, this fails and the caller must build
    /// the pieces as fresh subgraphs.
    pub fn remove_edge(&self, edge_idx: usize) -> Result<SubGraph<'g>, SubGraphError> {
        let edge = *self.edges.get(edge_idx).ok_or(SubGraphError::EdgeOutOfRange {
            idx: edge_idx,
            edges: self.edges.len(),
        })?;

        let orphaned = |v: usize| {
            self.kids[v]
                .iter()
                .chain(self.parents[v].iter())
                .all(|&e| e == edge_idx)
        };
        let rm_src = orphaned(edge.src());
        let rm_targ = orphaned(edge.targ());
        if rm_src && rm_targ {
            return Err(SubGraphError::WouldOrphanBoth(edge_idx));
        }

        let removed = if rm_src {
            Some(edge.src())
        } else if rm_targ {
            Some(edge.targ())
        } else {
            None
        };
        let adjust = |idx: usize| match removed {
            Some(r) if idx > r => idx - 1,
            _ => idx,
        };

        let ids: Vec<usize> = self
            .vertices
            .iter()
            .filter(|v| Some(v.idx) != removed)
            .map(|v| v.id)
            .collect();
        let vertices = find_vertices(self.graph, &ids)?;
        let edges: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| e.idx != edge_idx)
            .enumerate()
            .map(|(i, e)| e.copy_to(i, adjust(e.src()), adjust(e.targ())))
            .collect();

        let (sg, _) = Self::canonicalize(self.graph, vertices, edges)?;
        Ok(sg)
    }

    /// Weak connectivity from local vertex 0, ignoring edge direction.
    pub fn connected(&self) -> bool {
        if self.vertices.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.vertices.len()];
        let mut stack = vec![0usize];
        let mut reached = 0;
        while let Some(v) = stack.pop() {
            if seen[v] {
                continue;
            }
            seen[v] = true;
            reached += 1;
            for e in self.kids(v) {
                if !seen[e.targ()] {
                    stack.push(e.targ());
                }
            }
            for e in self.parents(v) {
                if !seen[e.src()] {
                    stack.push(e.src());
                }
            }
        }
        reached == self.vertices.len()
    }

    /// Structural equality. Only meaningful because both sides are canonical.
    pub fn equals(&self, other: &SubGraph<'_>) -> bool {
        if self.vertices.len() != other.vertices.len() || self.edges.len() != other.edges.len() {
            return false;
        }
        let same_vertices = self
            .vertices
            .iter()
            .zip(&other.vertices)
            .all(|(a, b)| a.color == b.color);
        if !same_vertices {
            return false;
        }
        self.edges.iter().zip(&other.edges).all(|(a, b)| {
            a.color == b.color
                && self.vertices[a.src()].color == other.vertices[b.src()].color
                && self.vertices[a.targ()].color == other.vertices[b.targ()].color
        })
    }

    /// xxh64 of [`short_label`](Self::short_label).
    pub fn fingerprint(&self) -> u64 {
        fingerprint(&self.short_label())
    }

    /// [`fingerprint`](Self::fingerprint) as 16 hex digits.
    pub fn fingerprint_hex(&self) -> String {
        format!("{:016x}", self.fingerprint())
    }
}

impl fmt::Debug for SubGraph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubGraph")
            .field("vertices", &self.vertices)
            .field("edges", &self.edges)
            .finish_non_exhaustive()
    }
}
