//! Append-only colored digraph.
//!
//! A `Graph` is built incrementally with [`Graph::add_vertex`] and
//! [`Graph::add_edge`], then frozen by [`Graph::finalize`]. Adjacency is
//! index-based: `kids[v]` and `parents[v]` hold positions in the edge array.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::incidence::{canonical_order, CanonicalOrder};
use crate::oracle::{CanonicalOracle, OracleError, RefinementOracle};
use crate::types::{Color, ColorTable, ColoredLink, Edge, Link, Vertex};

/// Vertex and edge counts stay addressable by the 32-bit byte layouts.
pub const MAX_ELEMENTS: usize = u32::MAX as usize;

/// Root container for vertices, edges and their colors.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) kids: Vec<Vec<usize>>,
    pub(crate) parents: Vec<Vec<usize>>,
    pub(crate) colors: ColorTable,
    closed: bool,
    canon: bool,
    oracle: Arc<dyn CanonicalOracle>,
}

impl Graph {
    /// Create an empty graph with room for `vertices` vertices and `edges`
    /// edges, canonicalized by the built-in oracle.
    pub fn new(vertices: usize, edges: usize) -> Self {
        Self::with_oracle(vertices, edges, Arc::new(RefinementOracle::default()))
    }

    /// Create an empty graph that canonicalizes through `oracle`.
    pub fn with_oracle(vertices: usize, edges: usize, oracle: Arc<dyn CanonicalOracle>) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            kids: Vec::with_capacity(vertices),
            parents: Vec::with_capacity(vertices),
            colors: ColorTable::with_capacity(vertices),
            closed: false,
            canon: false,
            oracle,
        }
    }

    /// Append a vertex. `id` is not interpreted; it is carried along so the
    /// caller can track identity.
    ///
    /// Returns `None` once the graph is finalized or holds
    /// [`MAX_ELEMENTS`] vertices.
    pub fn add_vertex(&mut self, id: usize, label: &str) -> Option<Vertex> {
        if self.closed || self.vertices.len() >= MAX_ELEMENTS {
            return None;
        }
        let v = Vertex {
            idx: self.vertices.len(),
            id,
            color: self.colors.intern(label),
        };
        self.vertices.push(v);
        self.kids.push(Vec::new());
        self.parents.push(Vec::new());
        Some(v)
    }

    /// Append an edge `u -> v`.
    ///
    /// Edges between the same ordered pair must differ in color. Returns
    /// `None` for a repeated `(u, v, label)`, once the graph is finalized or
    /// full, or if either handle does not belong to this graph.
    pub fn add_edge(&mut self, u: &Vertex, v: &Vertex, label: &str) -> Option<Edge> {
        if self.closed
            || self.edges.len() >= MAX_ELEMENTS
            || u.idx >= self.vertices.len()
            || v.idx >= self.vertices.len()
        {
            return None;
        }
        if let Some(color) = self.colors.lookup(label) {
            let link = ColoredLink::new(u.idx, v.idx, color);
            if self.kids(u.idx).any(|e| e.colored_link() == link) {
                debug!(src = u.idx, targ = v.idx, color = %color, "duplicate edge rejected");
                return None;
            }
        }
        let e = Edge {
            link: Link::new(u.idx, v.idx),
            idx: self.edges.len(),
            color: self.colors.intern(label),
        };
        self.edges.push(e);
        self.kids[e.src()].push(e.idx);
        self.parents[e.targ()].push(e.idx);
        Some(e)
    }

    /// Lock the graph. Idempotent.
    pub fn finalize(&mut self) {
        if !self.closed {
            debug!(
                vertices = self.vertices.len(),
                edges = self.edges.len(),
                colors = self.colors.len(),
                "graph finalized"
            );
        }
        self.closed = true;
    }

    /// True once [`finalize`](Self::finalize) has run.
    pub fn is_finalized(&self) -> bool {
        self.closed
    }

    /// True if this graph was produced by [`canonical`](Self::canonical).
    pub fn canonized(&self) -> bool {
        self.canon
    }

    /// Canonical vertex and edge orders. Finalizes the graph.
    pub fn canonical_permutation(&mut self) -> Result<CanonicalOrder, OracleError> {
        self.finalize();
        canonical_order(&self.vertices, &self.edges, self.oracle.as_ref())
    }

    /// A new finalized graph with vertices and edges in canonical order.
    /// Finalizes this graph.
    pub fn canonical(&mut self) -> Result<Graph, OracleError> {
        let order = self.canonical_permutation()?;

        let mut vertices = vec![Vertex { idx: 0, id: 0, color: Color(0) }; self.vertices.len()];
        for (i, &j) in order.vord.iter().enumerate() {
            vertices[j] = self.vertices[i].copy_to(j);
        }
        let mut edges = vec![Edge { link: Link::new(0, 0), idx: 0, color: Color(0) }; self.edges.len()];
        for (i, &j) in order.eord.iter().enumerate() {
            let e = &self.edges[i];
            edges[j] = e.copy_to(j, order.vord[e.src()], order.vord[e.targ()]);
        }

        let mut kids = vec![Vec::new(); vertices.len()];
        let mut parents = vec![Vec::new(); vertices.len()];
        for e in &edges {
            kids[e.src()].push(e.idx);
            parents[e.targ()].push(e.idx);
        }

        Ok(Graph {
            vertices,
            edges,
            kids,
            parents,
            colors: self.colors.clone(),
            closed: true,
            canon: true,
            oracle: Arc::clone(&self.oracle),
        })
    }

    /// All vertices in index order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All edges in index order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Vertex at `idx`.
    pub fn vertex(&self, idx: usize) -> Option<&Vertex> {
        self.vertices.get(idx)
    }

    /// Outgoing edges of vertex `idx`.
    pub fn kids(&self, idx: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.kids
            .get(idx)
            .into_iter()
            .flatten()
            .map(move |&e| &self.edges[e])
    }

    /// Incoming edges of vertex `idx`.
    pub fn parents(&self, idx: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.parents
            .get(idx)
            .into_iter()
            .flatten()
            .map(move |&e| &self.edges[e])
    }

    /// The color table.
    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Label of a color, if this graph issued it.
    pub fn color_label(&self, color: Color) -> Option<&str> {
        self.colors.label(color)
    }

    /// How many vertices and edges carry `color`.
    pub fn color_frequency(&self, color: Color) -> usize {
        self.colors.frequency(color)
    }

    /// The oracle this graph canonicalizes with.
    pub fn oracle(&self) -> &dyn CanonicalOracle {
        self.oracle.as_ref()
    }

    /// Resolve edge labels to colors, ignoring labels this graph never saw.
    pub(crate) fn resolve_labels(&self, labels: &[&str]) -> HashSet<Color> {
        labels.iter().filter_map(|l| self.colors.lookup(l)).collect()
    }
}
