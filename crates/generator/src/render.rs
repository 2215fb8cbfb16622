//! Serialization of the OpenAPI document

use crate::openapi::OpenApiDocument;
use docs2oas_common::{ConversionError, Result};
use std::path::Path;
use std::str::FromStr;

/// Output serialization format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConversionError::Parse(format!(
                "Unknown output format '{}' (expected yaml or json)",
                other
            ))),
        }
    }
}

/// Render `document` as text, always ending in a newline
pub fn render(document: &OpenApiDocument, format: OutputFormat) -> Result<String> {
    let mut text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(document)?,
        OutputFormat::Json => serde_json::to_string_pretty(document)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SpecDocument;
    use docs2oas_common::ConverterConfig;

    fn empty_document() -> OpenApiDocument {
        OpenApiDocument::from_spec(&SpecDocument::default(), &ConverterConfig::default())
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("api.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("api.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("api.yaml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_path(Path::new("api")), OutputFormat::Yaml);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_yaml_header() {
        let text = render(&empty_document(), OutputFormat::Yaml).unwrap();
        assert!(text.starts_with("openapi: "));
        assert!(text.contains("3.0.0"));
        assert!(text.contains("title: API"));
    }

    #[test]
    fn test_render_json_parses_back() {
        let text = render(&empty_document(), OutputFormat::Json).unwrap();
        assert!(text.ends_with('\n'));

        let parsed: OpenApiDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, empty_document());
    }
}
