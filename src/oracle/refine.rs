//! Default oracle, backed by the `canonical-form` crate.
//!
//! The oracle graph is wrapped in an [`Adjacency`] that implements
//! [`Canonize`]: node colors become the invariant coloring and each node's
//! out- and in-neighbours become its invariant neighbourhood. The crate's
//! partition refinement and search return the morphism to the canonical form.
//!
//! That morphism is then re-ranked by `(color, canonical position)`, so the
//! returned order always lists nodes by ascending color. The re-ranking only
//! reads the canonical form, which keeps the result invariant.

use canonical_form::Canonize;
use tracing::trace;

use super::{check_permutation, CanonicalOracle, OracleError, OracleGraph};

/// Built-in canonical labeling oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefinementOracle;

impl CanonicalOracle for RefinementOracle {
    fn canonical_permutation(&self, graph: &OracleGraph) -> Result<Vec<usize>, OracleError> {
        let n = graph.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let morphism = Adjacency::new(graph).morphism_to_canonical();
        check_permutation(&morphism, n)?;

        let colors = graph.colors();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&v| (colors[v], morphism[v]));

        let mut perm = vec![0; n];
        for (rank, v) in order.into_iter().enumerate() {
            perm[v] = rank;
        }

        trace!(nodes = n, edges = graph.edges().len(), "canonical permutation computed");
        Ok(perm)
    }
}

/// Colored adjacency lists with every list sorted, so that equal structures
/// compare equal under the derived `Ord`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Adjacency {
    colors: Vec<u32>,
    out: Vec<Vec<usize>>,
    inc: Vec<Vec<usize>>,
}

impl Adjacency {
    fn new(graph: &OracleGraph) -> Self {
        let n = graph.len();
        let mut out = vec![Vec::new(); n];
        let mut inc = vec![Vec::new(); n];
        for e in graph.edges() {
            out[e.src].push(e.targ);
            inc[e.targ].push(e.src);
        }
        for list in out.iter_mut().chain(inc.iter_mut()) {
            list.sort_unstable();
        }
        Self {
            colors: graph.colors().to_vec(),
            out,
            inc,
        }
    }
}

impl Canonize for Adjacency {
    fn size(&self) -> usize {
        self.colors.len()
    }

    fn apply_morphism(&self, perm: &[usize]) -> Self {
        let n = self.size();
        let mut colors = vec![0; n];
        let mut out = vec![Vec::new(); n];
        let mut inc = vec![Vec::new(); n];
        for v in 0..n {
            colors[perm[v]] = self.colors[v];
            out[perm[v]] = self.out[v].iter().map(|&w| perm[w]).collect();
            inc[perm[v]] = self.inc[v].iter().map(|&w| perm[w]).collect();
        }
        for list in out.iter_mut().chain(inc.iter_mut()) {
            list.sort_unstable();
        }
        Self { colors, out, inc }
    }

    fn invariant_coloring(&self) -> Option<Vec<u64>> {
        Some(self.colors.iter().map(|&c| u64::from(c)).collect())
    }

    fn invariant_neighborhood(&self, u: usize) -> Vec<Vec<usize>> {
        vec![self.out[u].clone(), self.inc[u].clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relabel(graph: &OracleGraph, perm: &[usize]) -> OracleGraph {
        let mut colors = vec![0; graph.len()];
        for (old, &new) in perm.iter().enumerate() {
            colors[new] = graph.colors()[old];
        }
        let edges: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .map(|e| (perm[e.src], perm[e.targ]))
            .collect();
        OracleGraph::from_parts(colors, &edges).unwrap()
    }

    fn scenario() -> OracleGraph {
        OracleGraph::from_parts(
            vec![1, 1, 0, 0, 0, 0],
            &[(0, 2), (0, 3), (1, 4), (1, 5), (3, 5), (4, 2)],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_graph() {
        let perm = RefinementOracle.canonical_permutation(&OracleGraph::new()).unwrap();
        assert!(perm.is_empty());
    }

    #[test]
    fn test_colors_sort_first() {
        let g = OracleGraph::from_parts(vec![3, 1, 2], &[]).unwrap();
        let perm = RefinementOracle.canonical_permutation(&g).unwrap();
        assert_eq!(perm, vec![2, 0, 1]);
    }

    #[test]
    fn test_result_is_permutation() {
        let perm = RefinementOracle.canonical_permutation(&scenario()).unwrap();
        assert!(check_permutation(&perm, 6).is_ok());
    }

    #[test]
    fn test_relabeling_invariance() {
        let g = scenario();
        let expected = g.canonical(&RefinementOracle).unwrap();
        for perm in [[5, 4, 3, 2, 1, 0], [1, 0, 2, 3, 5, 4], [2, 3, 0, 1, 4, 5]] {
            let h = relabel(&g, &perm);
            assert_eq!(h.canonical(&RefinementOracle).unwrap(), expected);
        }
    }

    #[test]
    fn test_symmetric_star() {
        let mut colors = vec![0];
        colors.extend(std::iter::repeat(1).take(8));
        let edges: Vec<(usize, usize)> = (1..=8).map(|v| (0, v)).collect();
        let g = OracleGraph::from_parts(colors, &edges).unwrap();

        let perm = RefinementOracle.canonical_permutation(&g).unwrap();
        assert_eq!(perm[0], 0);
    }

    #[test]
    fn test_cycle_differs_from_two_triangles() {
        let hexagon: Vec<(usize, usize)> = (0..6).map(|v| (v, (v + 1) % 6)).collect();
        let triangles = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)];
        let g = OracleGraph::from_parts(vec![0; 6], &hexagon).unwrap();
        let h = OracleGraph::from_parts(vec![0; 6], &triangles).unwrap();

        assert!(!g.is_isomorphic(&h, &RefinementOracle).unwrap());
        let rotated = relabel(&g, &[2, 3, 4, 5, 0, 1]);
        assert!(g.is_isomorphic(&rotated, &RefinementOracle).unwrap());
    }

    #[test]
    fn test_canonical_form_is_fixed() {
        let canonical = scenario().canonical(&RefinementOracle).unwrap();
        assert_eq!(canonical.canonical(&RefinementOracle).unwrap(), canonical);
    }
}
