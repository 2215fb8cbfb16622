//! Feed of endpoint documents into a conversion run

use crate::{ConversionError, NodeTree, Result};

/// A document that could not be read or converted
#[derive(Debug)]
pub struct DocumentFailure {
    /// Identity of the offending document
    pub source: String,
    pub error: ConversionError,
}

/// Everything a source produced for one run
#[derive(Debug, Default)]
pub struct DocumentBatch {
    /// Documents that were read successfully
    pub documents: Vec<NodeTree>,
    /// Documents that were found but could not be read
    pub failures: Vec<DocumentFailure>,
}

impl DocumentBatch {
    pub fn from_documents(documents: Vec<NodeTree>) -> Self {
        Self {
            documents,
            failures: Vec::new(),
        }
    }
}

/// Supplies the parsed documents for one run
///
/// Documents are independent; their order only affects the key order of the
/// produced document. A document that cannot be read is reported in the
/// batch. An error here means the whole feed is unusable (for example an
/// unreadable input directory).
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait DocumentSource {
    fn documents(&self) -> Result<DocumentBatch>;
}
