//! Edge-color transform and permutation applier.
//!
//! The oracle only understands node colors, so each colored edge `u -c-> v`
//! becomes an incidence node `e` colored `c` with two plain arcs `u -> e` and
//! `e -> v`. Real vertices take indices `0..|V|`, incidence nodes take
//! `|V|..|V|+|E|` in edge order.
//!
//! ```text
//!   u ──c──► v        ==>        u ──► (e:c) ──► v
//! ```
//!
//! An incidence node always has exactly one in-arc and one out-arc, which
//! keeps color-respecting automorphisms of the transformed graph in
//! one-to-one correspondence with those of the edge-colored multigraph.

use tracing::trace;

use crate::oracle::{check_permutation, CanonicalOracle, OracleError, OracleGraph};
use crate::types::{Edge, Vertex};

/// Vertex and edge orderings derived from one oracle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOrder {
    /// `vord[old_vertex_idx] = canonical_vertex_idx`.
    pub vord: Vec<usize>,
    /// `eord[old_edge_idx] = canonical_edge_idx`.
    pub eord: Vec<usize>,
    /// True if the input was already in canonical order.
    pub canonized: bool,
}

impl CanonicalOrder {
    /// The identity order for `vertices` vertices and `edges` edges.
    pub fn identity(vertices: usize, edges: usize) -> Self {
        Self {
            vord: (0..vertices).collect(),
            eord: (0..edges).collect(),
            canonized: true,
        }
    }
}

/// The transformed oracle input for one vertex/edge set.
#[derive(Debug)]
pub struct IncidenceMap {
    len_v: usize,
    len_e: usize,
    first_edge: usize,
    graph: OracleGraph,
}

impl IncidenceMap {
    /// Build the incidence graph. Edge endpoints are indices into `vertices`.
    pub fn new(vertices: &[Vertex], edges: &[Edge]) -> Result<Self, OracleError> {
        let mut graph = OracleGraph::with_capacity(vertices.len() + edges.len(), edges.len() * 2);
        for v in vertices {
            graph.add_vertex(v.color.as_u32());
        }
        let first_edge = graph.len();
        for e in edges {
            let node = graph.add_vertex(e.color.as_u32());
            graph.add_edge(e.src(), node)?;
            graph.add_edge(node, e.targ())?;
        }
        Ok(Self {
            len_v: vertices.len(),
            len_e: edges.len(),
            first_edge,
            graph,
        })
    }

    /// Index of the first incidence node.
    pub fn first_edge_index(&self) -> usize {
        self.first_edge
    }

    /// The oracle input.
    pub fn graph(&self) -> &OracleGraph {
        &self.graph
    }

    /// Run the oracle once and split its permutation into vertex and edge
    /// orders.
    ///
    /// Consumes the map: the transformed graph is dropped as soon as the
    /// orders are known, on success and on error alike.
    pub fn canonical_order(self, oracle: &dyn CanonicalOracle) -> Result<CanonicalOrder, OracleError> {
        let perm = oracle.canonical_permutation(&self.graph)?;
        check_permutation(&perm, self.graph.len())?;
        trace!(
            vertices = self.len_v,
            edges = self.len_e,
            "oracle permutation received"
        );
        Ok(self.split(&perm))
    }

    /// Partition `perm` at the first incidence node and re-densify each side.
    fn split(&self, perm: &[usize]) -> CanonicalOrder {
        let canonized = perm.iter().enumerate().all(|(i, &p)| i == p);

        let mut vp: Vec<(usize, usize)> = Vec::with_capacity(self.len_v);
        let mut ep: Vec<(usize, usize)> = Vec::with_capacity(self.len_e);
        for (i, &p) in perm.iter().enumerate() {
            if i < self.first_edge {
                vp.push((i, p));
            } else {
                ep.push((i - self.first_edge, p));
            }
        }

        CanonicalOrder {
            vord: densify(vp, self.len_v),
            eord: densify(ep, self.len_e),
            canonized,
        }
    }
}

/// Stable-sort `(idx, p)` pairs by `p` and hand out ranks `0..len`.
fn densify(mut pairs: Vec<(usize, usize)>, len: usize) -> Vec<usize> {
    pairs.sort_by_key(|&(_, p)| p);
    let mut order = vec![0usize; len];
    for (rank, (idx, _)) in pairs.into_iter().enumerate() {
        order[idx] = rank;
    }
    order
}

/// Canonical order for a vertex/edge set. Single vertices without edges, and
/// empty sets, are canonical as given and never reach the oracle.
pub fn canonical_order(
    vertices: &[Vertex],
    edges: &[Edge],
    oracle: &dyn CanonicalOracle,
) -> Result<CanonicalOrder, OracleError> {
    if vertices.len() <= 1 && edges.is_empty() {
        return Ok(CanonicalOrder::identity(vertices.len(), 0));
    }
    IncidenceMap::new(vertices, edges)?.canonical_order(oracle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::RefinementOracle;
    use crate::types::{Color, Link};

    #[derive(Debug)]
    struct FixedOracle(Vec<usize>);

    impl CanonicalOracle for FixedOracle {
        fn canonical_permutation(&self, _graph: &OracleGraph) -> Result<Vec<usize>, OracleError> {
            Ok(self.0.clone())
        }
    }

    fn vertex(idx: usize, color: u32) -> Vertex {
        Vertex { idx, id: idx, color: Color(color) }
    }

    fn edge(idx: usize, src: usize, targ: usize, color: u32) -> Edge {
        Edge { link: Link::new(src, targ), idx, color: Color(color) }
    }

    #[test]
    fn test_incidence_layout() {
        let vertices = vec![vertex(0, 0), vertex(1, 1)];
        let edges = vec![edge(0, 0, 1, 2), edge(1, 1, 0, 2)];
        let map = IncidenceMap::new(&vertices, &edges).unwrap();

        assert_eq!(map.first_edge_index(), 2);
        assert_eq!(map.graph().colors(), &[0, 1, 2, 2]);
        assert_eq!(
            map.graph().edges(),
            &[Link::new(0, 2), Link::new(2, 1), Link::new(1, 3), Link::new(3, 0)]
        );
    }

    #[test]
    fn test_split_densifies_each_side() {
        let vertices = vec![vertex(0, 0), vertex(1, 0)];
        let edges = vec![edge(0, 0, 1, 1), edge(1, 1, 0, 1)];
        let map = IncidenceMap::new(&vertices, &edges).unwrap();

        // vertices land at 3 and 0, edges at 1 and 2
        let order = map.canonical_order(&FixedOracle(vec![3, 0, 2, 1])).unwrap();
        assert_eq!(order.vord, vec![1, 0]);
        assert_eq!(order.eord, vec![1, 0]);
        assert!(!order.canonized);
    }

    #[test]
    fn test_identity_is_canonized() {
        let vertices = vec![vertex(0, 0), vertex(1, 1)];
        let edges = vec![edge(0, 0, 1, 2)];
        let map = IncidenceMap::new(&vertices, &edges).unwrap();
        let order = map.canonical_order(&FixedOracle(vec![0, 1, 2])).unwrap();
        assert!(order.canonized);
        assert_eq!(order.vord, vec![0, 1]);
        assert_eq!(order.eord, vec![0]);
    }

    #[test]
    fn test_malformed_permutation_is_rejected() {
        let vertices = vec![vertex(0, 0), vertex(1, 1)];
        let edges = vec![edge(0, 0, 1, 2)];
        let map = IncidenceMap::new(&vertices, &edges).unwrap();
        let err = map.canonical_order(&FixedOracle(vec![0, 0, 1])).unwrap_err();
        assert!(matches!(err, OracleError::InvalidPermutation(_)));
    }

    #[test]
    fn test_single_vertex_skips_oracle() {
        let order = canonical_order(&[vertex(0, 7)], &[], &FixedOracle(vec![])).unwrap();
        assert_eq!(order, CanonicalOrder::identity(1, 0));
    }

    #[test]
    fn test_edge_colors_distinguish() {
        let oracle = RefinementOracle::default();
        let vertices = vec![vertex(0, 0), vertex(1, 0)];
        let red = vec![edge(0, 0, 1, 1), edge(1, 1, 0, 2)];
        let order = canonical_order(&vertices, &red, &oracle).unwrap();
        // the edge colored 1 must come first
        assert_eq!(order.eord, vec![0, 1]);
    }
}
