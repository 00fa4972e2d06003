//! Color interning.
//!
//! Vertex and edge labels share one namespace: the first time a label is seen
//! it gets the next dense id, and every later use bumps its frequency.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Interned label id.
///
/// Ids are dense, assigned in first-seen order, and only meaningful relative to
/// the [`ColorTable`] that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// Raw id.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Raw id as an index into the color table.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Color {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Per-graph label table.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    labels: Vec<String>,
    ids: HashMap<String, Color>,
    frequency: Vec<usize>,
}

impl ColorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` labels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            ids: HashMap::with_capacity(capacity),
            frequency: Vec::with_capacity(capacity),
        }
    }

    /// Intern `label`, counting one more use of it.
    pub fn intern(&mut self, label: &str) -> Color {
        if let Some(&color) = self.ids.get(label) {
            self.frequency[color.index()] += 1;
            return color;
        }
        let color = Color(self.labels.len() as u32);
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), color);
        self.frequency.push(1);
        color
    }

    /// Look a label up without interning it.
    pub fn lookup(&self, label: &str) -> Option<Color> {
        self.ids.get(label).copied()
    }

    /// The label a color was interned from.
    pub fn label(&self, color: Color) -> Option<&str> {
        self.labels.get(color.index()).map(String::as_str)
    }

    /// How many times a color has been used. Unknown colors report 0.
    pub fn frequency(&self, color: Color) -> usize {
        self.frequency.get(color.index()).copied().unwrap_or(0)
    }

    /// Whether the table issued this color.
    pub fn contains(&self, color: Color) -> bool {
        color.index() < self.labels.len()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
