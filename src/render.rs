//! Debug text forms.
//!
//! `label()` is a compact string built only from canonical positions and color
//! labels, so isomorphic canonical structures render identically. `Display`
//! writes graphviz dot keyed by caller ids.

use std::fmt;

use crate::graph::Graph;
use crate::subgraph::SubGraph;
use crate::types::{Color, ColorTable};

/// Escape the characters `label()` uses as delimiters.
pub fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' | '(' | ')' | '[' | ']' => {
                out.push('\\');
                out.push(c);
            }
            '-' if chars.peek() == Some(&'>') => {
                chars.next();
                out.push_str("\\-\\>");
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for a quoted dot attribute.
fn escape_dot(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn color_name(colors: &ColorTable, color: Color) -> &str {
    colors.label(color).unwrap_or_default()
}

fn write_label(
    out: &mut String,
    colors: &ColorTable,
    vertices: impl Iterator<Item = (usize, Color)>,
    edges: impl Iterator<Item = (usize, usize, Color)>,
) {
    for (idx, color) in vertices {
        out.push_str(&format!("({}:{})", idx, escape_label(color_name(colors, color))));
    }
    for (src, targ, color) in edges {
        out.push_str(&format!("[{}->{}:{}]", src, targ, escape_label(color_name(colors, color))));
    }
}

impl Graph {
    /// `(idx:color)...[src->targ:color]...` in current array order.
    pub fn label(&self) -> String {
        let mut out = String::new();
        write_label(
            &mut out,
            &self.colors,
            self.vertices.iter().map(|v| (v.idx, v.color)),
            self.edges.iter().map(|e| (e.src(), e.targ(), e.color)),
        );
        out
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph {{")?;
        for v in &self.vertices {
            writeln!(
                f,
                "    {} [label=\"{}\"];",
                v.id,
                escape_dot(color_name(&self.colors, v.color))
            )?;
        }
        for e in &self.edges {
            writeln!(
                f,
                "    {} -> {} [label=\"{}\"];",
                self.vertices[e.src()].id,
                self.vertices[e.targ()].id,
                escape_dot(color_name(&self.colors, e.color))
            )?;
        }
        writeln!(f, "}}")
    }
}

impl SubGraph<'_> {
    /// `E:V` followed by the [`Graph::label`] form of the canonical arrays.
    pub fn label(&self) -> String {
        let mut out = format!("{}:{}", self.edges.len(), self.vertices.len());
        write_label(
            &mut out,
            self.graph().colors(),
            self.vertices.iter().map(|v| (v.idx, v.color)),
            self.edges.iter().map(|e| (e.src(), e.targ(), e.color)),
        );
        out
    }
}

impl fmt::Display for SubGraph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph();
        // node names are the caller ids the parent graph was built with
        let caller_id = |id: usize| graph.vertex(id).map_or(id, |v| v.id);

        writeln!(f, "digraph {{")?;
        for v in &self.vertices {
            writeln!(
                f,
                "    {} [idx=\"{}\",label=\"{}\"];",
                caller_id(v.id),
                v.id,
                escape_dot(color_name(graph.colors(), v.color))
            )?;
        }
        for e in &self.edges {
            writeln!(
                f,
                "    {} -> {} [label=\"{}\"];",
                caller_id(self.vertices[e.src()].id),
                caller_id(self.vertices[e.targ()].id),
                escape_dot(color_name(graph.colors(), e.color))
            )?;
        }
        writeln!(f, "}}")
    }
}
