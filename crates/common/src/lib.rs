//! Common types and utilities for docs2oas
//!
//! This crate contains the shared data structures used across the parser,
//! generator, and CLI components: the error type, the node tree produced by
//! the markdown reader, the converter configuration, and the
//! [`DocumentSource`] seam that feeds documents into a conversion run.

mod config;
mod node;
mod source;

pub use config::{ConverterConfig, RequiredStyle};
pub use node::{Node, NodeTree, Table};
pub use source::{DocumentBatch, DocumentFailure, DocumentSource};

#[cfg(feature = "mock")]
pub use source::MockDocumentSource;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while converting endpoint documents
#[derive(Error, Debug)]
pub enum ConversionError {
    /// A table row does not have the expected shape
    #[error("Malformed table: {0}")]
    MalformedTable(String),

    /// A field declares a type outside the supported primitive set
    #[error("Unknown type '{0}' (expected one of: string, integer, float, boolean, object)")]
    UnknownType(String),

    /// The title or description line is absent or malformed
    #[error("Missing required section: {0}")]
    MissingRequiredSection(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Primitive type names accepted in field and parameter tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Float,
    Boolean,
    Object,
}

impl PrimitiveType {
    /// Lowercase name as written in the source tables
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Float => "float",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Object => "object",
        }
    }
}

impl FromStr for PrimitiveType {
    type Err = ConversionError;

    /// Case-insensitive lookup; anything outside the supported set fails closed.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(PrimitiveType::String),
            "integer" => Ok(PrimitiveType::Integer),
            "float" => Ok(PrimitiveType::Float),
            "boolean" => Ok(PrimitiveType::Boolean),
            "object" => Ok(PrimitiveType::Object),
            _ => Err(ConversionError::UnknownType(s.trim().to_string())),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_type_case_insensitive() {
        assert_eq!("string".parse::<PrimitiveType>().unwrap(), PrimitiveType::String);
        assert_eq!("Integer".parse::<PrimitiveType>().unwrap(), PrimitiveType::Integer);
        assert_eq!("FLOAT".parse::<PrimitiveType>().unwrap(), PrimitiveType::Float);
        assert_eq!(" boolean ".parse::<PrimitiveType>().unwrap(), PrimitiveType::Boolean);
        assert_eq!("Object".parse::<PrimitiveType>().unwrap(), PrimitiveType::Object);
    }

    #[test]
    fn test_primitive_type_unknown() {
        let err = "uuid".parse::<PrimitiveType>().unwrap_err();
        assert!(matches!(err, ConversionError::UnknownType(ref name) if name == "uuid"));
    }

    #[test]
    fn test_primitive_type_display() {
        assert_eq!(PrimitiveType::Float.to_string(), "float");
    }
}
