//! Canonical labeling contract.
//!
//! An oracle takes a digraph whose only decoration is a color per node and
//! returns a permutation `P` with `P[old] = new`. Isomorphic inputs must come
//! back as identical graphs once `P` is applied. Edge colors are not part of
//! the contract; see [`crate::incidence`] for how they are encoded.
//!
//! ```text
//! OracleGraph ──► CanonicalOracle ──► P ──► OracleGraph::permute ──► canonical graph
//! ```

pub mod refine;

use std::cmp::Ordering;
use std::fmt;

use crate::types::Link;

pub use refine::RefinementOracle;

/// Errors raised by an oracle call. Any of them aborts the operation that
/// needed the canonical order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// An edge referenced a node that does not exist.
    #[error("edge {src}->{targ} is out of range for {nodes} nodes")]
    EdgeOutOfRange {
        /// Edge source.
        src: usize,
        /// Edge target.
        targ: usize,
        /// Number of nodes in the graph.
        nodes: usize,
    },
    /// A permutation had the wrong length or repeated an index.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
}

/// Computes canonical permutations of node-colored digraphs.
///
/// Implementations must be deterministic and must map isomorphic inputs to the
/// same permuted graph.
pub trait CanonicalOracle: fmt::Debug + Send + Sync {
    /// Return `P` with `P[old_index] = canonical_index`.
    fn canonical_permutation(&self, graph: &OracleGraph) -> Result<Vec<usize>, OracleError>;
}

/// Oracle input: node colors plus uncolored directed edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OracleGraph {
    colors: Vec<u32>,
    edges: Vec<Link>,
}

impl OracleGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `nodes` nodes and `edges` edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            colors: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Build a graph from colors and `(src, targ)` pairs.
    pub fn from_parts(colors: Vec<u32>, edges: &[(usize, usize)]) -> Result<Self, OracleError> {
        let mut graph = Self {
            edges: Vec::with_capacity(edges.len()),
            colors,
        };
        for &(src, targ) in edges {
            graph.add_edge(src, targ)?;
        }
        Ok(graph)
    }

    /// Append a node and return its index.
    pub fn add_vertex(&mut self, color: u32) -> usize {
        self.colors.push(color);
        self.colors.len() - 1
    }

    /// Append a directed edge between existing nodes.
    pub fn add_edge(&mut self, src: usize, targ: usize) -> Result<(), OracleError> {
        let nodes = self.colors.len();
        if src >= nodes || targ >= nodes {
            return Err(OracleError::EdgeOutOfRange { src, targ, nodes });
        }
        self.edges.push(Link::new(src, targ));
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Node colors in index order.
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Link] {
        &self.edges
    }

    /// Apply `perm` (`perm[old] = new`). Edges of the result are sorted.
    pub fn permute(&self, perm: &[usize]) -> Result<Self, OracleError> {
        check_permutation(perm, self.len())?;
        let mut colors = vec![0; self.len()];
        for (old, &new) in perm.iter().enumerate() {
            colors[new] = self.colors[old];
        }
        let mut edges: Vec<Link> = self
            .edges
            .iter()
            .map(|e| Link::new(perm[e.src], perm[e.targ]))
            .collect();
        edges.sort_unstable();
        Ok(Self { colors, edges })
    }

    /// The canonical form of this graph under `oracle`.
    pub fn canonical(&self, oracle: &dyn CanonicalOracle) -> Result<Self, OracleError> {
        let perm = oracle.canonical_permutation(self)?;
        self.permute(&perm)
    }

    /// Isomorphism test by canonicalizing both sides and comparing.
    pub fn is_isomorphic(&self, other: &Self, oracle: &dyn CanonicalOracle) -> Result<bool, OracleError> {
        if self.len() != other.len() || self.edges.len() != other.edges.len() {
            return Ok(false);
        }
        let a = self.canonical(oracle)?;
        let b = other.canonical(oracle)?;
        Ok(a.cmp(&b) == Ordering::Equal)
    }
}

// Orders by node count, then color sequence, then edge list. Only meaningful
// as an isomorphism test when both sides are canonical.
impl PartialOrd for OracleGraph {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OracleGraph {
    fn cmp(&self, other: &Self) -> Ordering {
        self.colors
            .len()
            .cmp(&other.colors.len())
            .then_with(|| self.colors.cmp(&other.colors))
            .then_with(|| self.edges.cmp(&other.edges))
    }
}

/// Check that `perm` is a permutation of `0..n`.
pub fn check_permutation(perm: &[usize], n: usize) -> Result<(), OracleError> {
    if perm.len() != n {
        return Err(OracleError::InvalidPermutation(format!(
            "expected {} entries, got {}",
            n,
            perm.len()
        )));
    }
    let mut seen = vec![false; n];
    for &p in perm {
        if p >= n {
            return Err(OracleError::InvalidPermutation(format!("index {} out of range", p)));
        }
        if seen[p] {
            return Err(OracleError::InvalidPermutation(format!("index {} repeated", p)));
        }
        seen[p] = true;
    }
    Ok(())
}
