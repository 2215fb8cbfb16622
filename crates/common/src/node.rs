//! Normalized node tree for one endpoint document
//!
//! The markdown reader flattens a document into an ordered list of
//! headings, paragraphs and tables. All lookups the converter needs are
//! expressed over that flat list: headings delimit sections by level.

use serde::{Deserialize, Serialize};

/// One parsed endpoint document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTree {
    /// Document identity used in diagnostics (usually the file path)
    pub source: String,

    /// Block-level nodes in source order
    pub nodes: Vec<Node>,
}

/// A block-level node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// `#`..`######` heading, level 1..=6
    Heading { level: u8, text: String },

    /// A run of text lines
    Paragraph { text: String },

    /// A pipe table
    Table(Table),
}

/// Table with a header row and body rows of cell text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the header matching any of `names` (case-insensitive)
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers.iter().position(|h| {
            let h = h.trim();
            names.iter().any(|n| h.eq_ignore_ascii_case(n))
        })
    }
}

impl Node {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Node::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph { text: text.into() }
    }

    /// Heading level, if this node is a heading
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Node::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Node::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&str> {
        match self {
            Node::Paragraph { text } => Some(text),
            _ => None,
        }
    }
}

impl NodeTree {
    pub fn new(source: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            source: source.into(),
            nodes,
        }
    }

    /// First heading of `level`, returning its index and text
    pub fn first_heading(&self, level: u8) -> Option<(usize, &str)> {
        self.nodes.iter().enumerate().find_map(|(i, node)| match node {
            Node::Heading { level: l, text } if *l == level => Some((i, text.as_str())),
            _ => None,
        })
    }

    /// Index of the first heading of `level` whose text equals `text` exactly
    pub fn find_heading(&self, level: u8, text: &str) -> Option<usize> {
        self.nodes.iter().position(|node| {
            matches!(node, Node::Heading { level: l, text: t } if *l == level && t == text)
        })
    }

    /// Node immediately after `index`
    pub fn next_node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index + 1)
    }

    /// Nodes following the heading at `index`, up to the next heading of the
    /// same or a higher level (or the end of the document).
    ///
    /// Returns an empty slice if `index` is not a heading.
    pub fn section(&self, index: usize) -> &[Node] {
        let Some(level) = self.nodes.get(index).and_then(Node::heading_level) else {
            return &[];
        };

        let start = index + 1;
        let end = self.nodes[start..]
            .iter()
            .position(|node| node.heading_level().is_some_and(|l| l <= level))
            .map(|offset| start + offset)
            .unwrap_or(self.nodes.len());

        &self.nodes[start..end]
    }
}
