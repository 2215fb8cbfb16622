//! Converter configuration loaded from YAML files
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration.

use crate::{ConversionError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Value of the top-level `openapi` key
    pub openapi: String,
    /// `info.title`
    pub title: String,
    /// `info.version`
    pub version: String,
    /// Optional `info.description`
    pub description: Option<String>,
    /// Media type used for request and response content
    pub media_type: String,
    /// How parameter tables mark a parameter as required
    pub parameter_required: RequiredStyle,
}

/// Input convention for required parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredStyle {
    /// A `?` on the parameter name marks it optional
    #[default]
    Marker,
    /// An explicit `Required` column holds yes/no
    Column,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            openapi: "3.0.0".to_string(),
            title: "API".to_string(),
            version: "0.1.0".to_string(),
            description: None,
            media_type: "application/json".to_string(),
            parameter_required: RequiredStyle::Marker,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConversionError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            ConversionError::Parse(format!(
                "Failed to parse config YAML from {:?}: {}",
                path, e
            ))
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Override the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Override the API version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.openapi, "3.0.0");
        assert_eq!(config.media_type, "application/json");
        assert_eq!(config.parameter_required, RequiredStyle::Marker);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ConverterConfig::from_yaml("title: Tasks API\nparameter_required: column\n")
            .unwrap();
        assert_eq!(config.title, "Tasks API");
        assert_eq!(config.parameter_required, RequiredStyle::Column);
        assert_eq!(config.version, "0.1.0");
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(
            ConverterConfig::from_yaml("  \n").unwrap(),
            ConverterConfig::default()
        );
    }

    #[test]
    fn test_invalid_style_rejected() {
        assert!(ConverterConfig::from_yaml("parameter_required: sometimes\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version: 2.1.0").unwrap();
        writeln!(file, "description: Internal endpoints").unwrap();

        let config = ConverterConfig::load(file.path()).unwrap();
        assert_eq!(config.version, "2.1.0");
        assert_eq!(config.description.as_deref(), Some("Internal endpoints"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConverterConfig::load(Path::new("/nonexistent/docs2oas.yaml")).unwrap_err();
        assert!(matches!(err, ConversionError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let config = ConverterConfig::default()
            .with_title("Billing")
            .with_version("3.0");
        assert_eq!(config.title, "Billing");
        assert_eq!(config.version, "3.0");
    }
}
