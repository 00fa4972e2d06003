//! Core value types shared by graphs and subgraphs.

pub mod color;
pub mod element;

pub use color::{Color, ColorTable};
pub use element::{ColoredLink, Edge, Link, Vertex};
