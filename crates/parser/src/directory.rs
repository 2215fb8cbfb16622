//! Discovery of endpoint documents in a directory

use crate::MarkdownParser;
use docs2oas_common::{ConversionError, DocumentBatch, DocumentFailure, DocumentSource, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Reads every markdown document under a directory tree
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Markdown files under the root, sorted by path
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ConversionError::Parse(format!(
                "Not a directory: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| {
                ConversionError::Parse(format!(
                    "Failed to walk {}: {}",
                    self.root.display(),
                    e
                ))
            })?;

            if entry.file_type().is_file() && is_markdown(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}

impl DocumentSource for DirectorySource {
    /// Discovery errors are fatal; a file that cannot be read is recorded
    /// in the batch under its path.
    fn documents(&self) -> Result<DocumentBatch> {
        let mut batch = DocumentBatch::default();
        for path in self.discover()? {
            match MarkdownParser::from_file(&path) {
                Ok(parser) => batch.documents.push(parser.parse()),
                Err(error) => batch.failures.push(DocumentFailure {
                    source: path.display().to_string(),
                    error,
                }),
            }
        }
        Ok(batch)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
