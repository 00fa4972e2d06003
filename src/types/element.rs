//! Vertices, links and edges.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// A vertex in a [`Graph`](crate::Graph) or [`SubGraph`](crate::SubGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in the owning container. Reassigned whenever the container is
    /// rebuilt.
    pub idx: usize,
    /// Stable identity. In a `Graph` this is the caller-supplied id; in a
    /// `SubGraph` it is the index of the vertex in the parent graph.
    pub id: usize,
    /// Vertex color.
    pub color: Color,
}

impl Vertex {
    /// Copy this vertex into a new position, keeping its identity and color.
    pub fn copy_to(&self, idx: usize) -> Self {
        Self {
            idx,
            id: self.id,
            color: self.color,
        }
    }
}

/// Directed pair of vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Source index.
    pub src: usize,
    /// Target index.
    pub targ: usize,
}

impl Link {
    /// Create a new link.
    pub fn new(src: usize, targ: usize) -> Self {
        Self { src, targ }
    }
}

/// A link plus the color of the edge it carries. Used as a membership key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColoredLink {
    /// The endpoints.
    pub link: Link,
    /// The edge color.
    pub color: Color,
}

impl ColoredLink {
    /// Create a new colored link.
    pub fn new(src: usize, targ: usize, color: Color) -> Self {
        Self {
            link: Link::new(src, targ),
            color,
        }
    }
}

/// A colored directed edge.
///
/// Several edges may join the same ordered pair as long as their colors
/// differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Endpoints, as indices into the owning container's vertex array.
    pub link: Link,
    /// Position in the owning container's edge array.
    pub idx: usize,
    /// Edge color.
    pub color: Color,
}

impl Edge {
    /// Source vertex index.
    pub fn src(&self) -> usize {
        self.link.src
    }

    /// Target vertex index.
    pub fn targ(&self) -> usize {
        self.link.targ
    }

    /// Copy this edge into a new position with remapped endpoints.
    pub fn copy_to(&self, idx: usize, src: usize, targ: usize) -> Self {
        Self {
            link: Link::new(src, targ),
            idx,
            color: self.color,
        }
    }

    /// The edge as a membership key.
    pub fn colored_link(&self) -> ColoredLink {
        ColoredLink {
            link: self.link,
            color: self.color,
        }
    }
}
