//! # isolattice
//!
//! Canonical forms for vertex- and edge-colored directed multigraphs, and the
//! subgraph machinery built on them.
//!
//! The crate answers one question:
//!
//! > Are these two colored structures the same up to relabeling?
//!
//! ## Core Contract
//!
//! 1. Every [`SubGraph`] is stored in canonical order, so structural equality
//!    is a position-by-position comparison
//! 2. [`SubGraph::short_label`] is an opaque byte key that is equal exactly
//!    when the structures are isomorphic (for one color table)
//! 3. The [`Lattice`] of a subgraph enumerates its connected generalizations
//!    and links each to the nodes it specializes into
//!
//! ## Architecture
//!
//! ```text
//! Graph ──subgraph()──► SubGraph ──lattice()──► Lattice
//!                          │
//!              IncidenceMap (edge colors → nodes)
//!                          │
//!                   CanonicalOracle ──► permutation
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same structure + same color table → identical canonical order
//! - Canonicalizing a canonical structure changes nothing
//! - Lattice node order is breadth-first from the seed

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod config;
pub mod oracle;
pub mod incidence;
pub mod graph;
pub mod subgraph;
pub mod lattice;
pub mod codec;
pub mod canonical;
pub mod render;

// Re-exports
pub use types::{Color, ColorTable, ColoredLink, Edge, Link, Vertex};
pub use config::{LatticeConfig, DEFAULT_MAX_LATTICE_NODES};
pub use oracle::{check_permutation, CanonicalOracle, OracleError, OracleGraph, RefinementOracle};
pub use incidence::{canonical_order, CanonicalOrder, IncidenceMap};
pub use graph::Graph;
pub use subgraph::{SubGraph, SubGraphError};
pub use lattice::{Lattice, LatticeNodeSummary, LatticeSummary};
pub use codec::CodecError;
pub use canonical::{canonical_hash, canonical_hash_hex, fingerprint, to_canonical_bytes};
pub use render::escape_label;
