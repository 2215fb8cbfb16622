//! Markdown document parser

use super::blocks;
use docs2oas_common::{Node, NodeTree, Result, Table};
use std::fs;
use std::path::Path;

/// Markdown endpoint-document parser
///
/// Holds one document's text together with its identity (usually the file
/// path) so that diagnostics can name the offending document.
pub struct MarkdownParser {
    /// Document identity
    source: String,

    /// Raw markdown text
    text: String,
}

impl MarkdownParser {
    /// Create a parser over in-memory markdown text
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Load a markdown document from file path.
    ///
    /// Unreadable files, including invalid UTF-8, fail with
    /// [`ConversionError::Io`](docs2oas_common::ConversionError::Io).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), text))
    }

    /// Document identity
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flatten the document into a node tree
    pub fn parse(&self) -> NodeTree {
        let lines: Vec<&str> = self.text.lines().collect();
        let mut nodes = Vec::new();
        let mut paragraph: Vec<String> = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if let Some(marker) = blocks::fence(line) {
                flush_paragraph(&mut paragraph, &mut nodes);
                i = skip_fenced_block(&lines, i, marker);
                continue;
            }

            if line.trim().is_empty() {
                flush_paragraph(&mut paragraph, &mut nodes);
                i += 1;
                continue;
            }

            if let Some((level, text)) = blocks::heading(line) {
                flush_paragraph(&mut paragraph, &mut nodes);
                nodes.push(Node::Heading { level, text });
                i += 1;
                continue;
            }

            // A table needs its header row immediately followed by a delimiter row.
            if blocks::is_table_line(line)
                && lines.get(i + 1).is_some_and(|next| blocks::is_delimiter_row(next))
            {
                flush_paragraph(&mut paragraph, &mut nodes);
                let (table, next) = read_table(&lines, i);
                nodes.push(Node::Table(table));
                i = next;
                continue;
            }

            paragraph.push(blocks::clean_inline(line));
            i += 1;
        }

        flush_paragraph(&mut paragraph, &mut nodes);

        NodeTree::new(self.source.clone(), nodes)
    }
}

fn flush_paragraph(paragraph: &mut Vec<String>, nodes: &mut Vec<Node>) {
    if paragraph.is_empty() {
        return;
    }
    nodes.push(Node::paragraph(paragraph.join(" ")));
    paragraph.clear();
}

/// Returns the index of the first line after the closing fence
fn skip_fenced_block(lines: &[&str], start: usize, marker: &str) -> usize {
    let fence_char = marker.chars().next().unwrap_or('`');
    let mut i = start + 1;
    while i < lines.len() {
        let closes = blocks::fence(lines[i]).is_some_and(|closing| {
            closing.starts_with(fence_char) && closing.len() >= marker.len()
        });
        i += 1;
        if closes {
            break;
        }
    }
    i
}

/// Read a table starting at its header row; returns the table and the index
/// of the first line after it.
fn read_table(lines: &[&str], header: usize) -> (Table, usize) {
    let headers = blocks::split_row(lines[header]);
    let mut rows = Vec::new();

    // Skip header and delimiter rows
    let mut i = header + 2;
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty()
            || !blocks::is_table_line(line)
            || blocks::heading(line).is_some()
        {
            break;
        }
        rows.push(blocks::split_row(line));
        i += 1;
    }

    (Table { headers, rows }, i)
}
