//! Binary layouts for canonical subgraphs.
//!
//! ## Serialized subgraph (little-endian)
//!
//! ```text
//! u32 vertex_count
//! u32 edge_count
//! u32 parent_vertex_id                  × vertex_count
//! (u32 src, u32 targ, u32 edge_color)   × edge_count
//! ```
//!
//! Endpoints are local (canonical) indices. Vertex colors are not stored;
//! they are read back from the parent graph.
//!
//! ## Short label (big-endian, never decoded)
//!
//! ```text
//! u32 edge_count
//! u32 vertex_count
//! u32 vertex_color                      × vertex_count
//! (u32 src, u32 targ, u32 edge_color)   × edge_count
//! ```

use std::collections::HashSet;
use std::io::Cursor;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::warn;

use crate::graph::Graph;
use crate::subgraph::SubGraph;
use crate::types::{Color, Edge, Link, Vertex};

const HEADER_LEN: usize = 8;
const VERTEX_LEN: usize = 4;
const EDGE_LEN: usize = 12;

/// Error type for subgraph encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Fewer bytes than the fixed header.
    #[error("serialized subgraph truncated: need {needed} bytes, got {got}")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes supplied.
        got: usize,
    },
    /// The buffer length disagrees with the counts in the header.
    #[error("serialized subgraph has {got} bytes, header implies {expected}")]
    LengthMismatch {
        /// Length implied by the header.
        expected: u64,
        /// Length supplied.
        got: usize,
    },
    /// A stored vertex id is not an index of the parent graph.
    #[error("vertex id {0} is not in the parent graph")]
    UnknownVertex(usize),
    /// A vertex id is stored more than once.
    #[error("vertex id {0} appears more than once")]
    DuplicateVertex(usize),
    /// A stored edge endpoint is not a local vertex index.
    #[error("edge {idx} endpoint {endpoint} out of range for {vertices} vertices")]
    EndpointOutOfRange {
        /// Edge position.
        idx: usize,
        /// Offending endpoint.
        endpoint: usize,
        /// Number of vertices.
        vertices: usize,
    },
    /// A stored edge color is not in the parent graph's color table.
    #[error("edge {idx} has unknown color {color}")]
    UnknownColor {
        /// Edge position.
        idx: usize,
        /// Offending color.
        color: u32,
    },
    /// A count, id or index does not fit in 32 bits.
    #[error("value {0} does not fit in u32")]
    Overflow(usize),
    /// Reading or writing the buffer failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

fn to_u32(value: usize) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| CodecError::Overflow(value))
}

/// Key word for the short label. A [`Graph`] never holds more than
/// [`MAX_ELEMENTS`](crate::graph::MAX_ELEMENTS) vertices or edges, so counts
/// and indices always fit; anything larger saturates instead of wrapping.
fn key_word(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

impl<'g> SubGraph<'g> {
    /// Encode in the little-endian layout described in the module docs.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf =
            Vec::with_capacity(HEADER_LEN + self.vertices.len() * VERTEX_LEN + self.edges.len() * EDGE_LEN);
        buf.write_u32::<LittleEndian>(to_u32(self.vertices.len())?)?;
        buf.write_u32::<LittleEndian>(to_u32(self.edges.len())?)?;
        for v in &self.vertices {
            buf.write_u32::<LittleEndian>(to_u32(v.id)?)?;
        }
        for e in &self.edges {
            buf.write_u32::<LittleEndian>(to_u32(e.src())?)?;
            buf.write_u32::<LittleEndian>(to_u32(e.targ())?)?;
            buf.write_u32::<LittleEndian>(e.color.as_u32())?;
        }
        Ok(buf)
    }

    /// Decode a buffer produced by [`serialize`](Self::serialize) against the
    /// same parent graph.
    ///
    /// The stored order is trusted to be canonical and is not recomputed.
    pub fn deserialize(graph: &'g Graph, bytes: &[u8]) -> Result<SubGraph<'g>, CodecError> {
        decode(graph, bytes).map_err(|e| {
            warn!(error = %e, len = bytes.len(), "rejected serialized subgraph");
            e
        })
    }

    /// Opaque canonical byte key. Two subgraphs of graphs sharing a color
    /// table have equal keys exactly when [`equals`](Self::equals) holds.
    pub fn short_label(&self) -> Vec<u8> {
        let mut label =
            vec![0u8; HEADER_LEN + self.vertices.len() * VERTEX_LEN + self.edges.len() * EDGE_LEN];
        BigEndian::write_u32(&mut label[0..4], key_word(self.edges.len()));
        BigEndian::write_u32(&mut label[4..8], key_word(self.vertices.len()));

        let mut off = HEADER_LEN;
        for v in &self.vertices {
            BigEndian::write_u32(&mut label[off..off + 4], v.color.as_u32());
            off += VERTEX_LEN;
        }
        for e in &self.edges {
            BigEndian::write_u32(&mut label[off..off + 4], key_word(e.src()));
            BigEndian::write_u32(&mut label[off + 4..off + 8], key_word(e.targ()));
            BigEndian::write_u32(&mut label[off + 8..off + 12], e.color.as_u32());
            off += EDGE_LEN;
        }
        label
    }
}

fn decode<'g>(graph: &'g Graph, bytes: &[u8]) -> Result<SubGraph<'g>, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            needed: HEADER_LEN,
            got: bytes.len(),
        });
    }

    let mut cursor = Cursor::new(bytes);
    let len_v = cursor.read_u32::<LittleEndian>()? as usize;
    let len_e = cursor.read_u32::<LittleEndian>()? as usize;
    let expected = HEADER_LEN as u64 + len_v as u64 * VERTEX_LEN as u64 + len_e as u64 * EDGE_LEN as u64;
    if expected != bytes.len() as u64 {
        return Err(CodecError::LengthMismatch {
            expected,
            got: bytes.len(),
        });
    }

    let mut vertices = Vec::with_capacity(len_v);
    let mut seen = HashSet::with_capacity(len_v);
    for idx in 0..len_v {
        let id = cursor.read_u32::<LittleEndian>()? as usize;
        let parent = graph.vertex(id).ok_or(CodecError::UnknownVertex(id))?;
        if !seen.insert(id) {
            return Err(CodecError::DuplicateVertex(id));
        }
        vertices.push(Vertex {
            idx,
            id,
            color: parent.color,
        });
    }

    let mut edges = Vec::with_capacity(len_e);
    for idx in 0..len_e {
        let src = cursor.read_u32::<LittleEndian>()? as usize;
        let targ = cursor.read_u32::<LittleEndian>()? as usize;
        let color = Color(cursor.read_u32::<LittleEndian>()?);
        for endpoint in [src, targ] {
            if endpoint >= len_v {
                return Err(CodecError::EndpointOutOfRange {
                    idx,
                    endpoint,
                    vertices: len_v,
                });
            }
        }
        if !graph.colors().contains(color) {
            return Err(CodecError::UnknownColor {
                idx,
                color: color.as_u32(),
            });
        }
        edges.push(Edge {
            link: Link::new(src, targ),
            idx,
            color,
        });
    }

    Ok(SubGraph::assemble(graph, vertices, edges))
}
