//! OpenAPI 3.0 output model
//!
//! Plain serde types covering only what the converter emits. Maps are
//! ordered, so rendered key order follows document and row order.

use crate::document::SpecDocument;
use crate::operation::{OperationDescriptor, RequestBodyDescriptor, ResponseDescriptor};
use crate::parameters::ParameterDescriptor;
use crate::schema::{SchemaDef, SchemaRef};
use docs2oas_common::{ConverterConfig, PrimitiveType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// OpenAPI document root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version (e.g., "3.0.0")
    pub openapi: String,

    /// API metadata
    pub info: Info,

    /// Operations by URL then lowercase method
    pub paths: IndexMap<String, IndexMap<String, Operation>>,

    /// Reusable components
    pub components: Components,
}

/// API information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    #[serde(rename = "requestBody")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: header, query, path
    #[serde(rename = "in")]
    pub location: String,

    pub required: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub required: bool,

    /// Content by media type
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub schemas: IndexMap<String, Schema>,
}

/// Schema object or reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Type: string, number, integer, boolean, array, object
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Items schema (for array type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Required properties (for object schemas)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Properties (for object schemas)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
}

impl Schema {
    pub fn reference(name: &str) -> Self {
        Self {
            ref_path: Some(format!("{}{}", SCHEMA_REF_PREFIX, name)),
            ..Self::default()
        }
    }

    pub fn primitive(type_name: PrimitiveType) -> Self {
        let (schema_type, format) = match type_name {
            PrimitiveType::Float => ("number", Some("float")),
            other => (other.as_str(), None),
        };
        Self {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// Registry entry as a component schema; `required` and `properties`
    /// are always present, even when empty.
    pub fn object(def: &SchemaDef) -> Self {
        Self {
            schema_type: Some("object".to_string()),
            required: Some(def.required.iter().cloned().collect()),
            properties: Some(
                def.properties
                    .iter()
                    .map(|(name, value)| (name.clone(), Schema::from(value)))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Component name this schema points at, if it is a reference
    pub fn ref_name(&self) -> Option<&str> {
        self.ref_path
            .as_deref()
            .and_then(|path| path.strip_prefix(SCHEMA_REF_PREFIX))
    }
}

impl From<&SchemaRef> for Schema {
    fn from(value: &SchemaRef) -> Self {
        match value {
            SchemaRef::Primitive(type_name) => Schema::primitive(*type_name),
            SchemaRef::ArrayOf(items) => Schema::array(Schema::from(items.as_ref())),
            SchemaRef::NamedRef(name) => Schema::reference(name),
        }
    }
}

impl OpenApiDocument {
    /// Build the output document for a converted specification
    pub fn from_spec(spec: &SpecDocument, config: &ConverterConfig) -> Self {
        let paths = spec
            .paths
            .iter()
            .map(|(url, methods)| {
                let operations = methods
                    .iter()
                    .map(|(method, op)| {
                        (method.as_str().to_string(), convert_operation(op, config))
                    })
                    .collect();
                (url.clone(), operations)
            })
            .collect();

        let schemas = spec
            .schemas
            .iter()
            .map(|def| (def.name.clone(), Schema::object(def)))
            .collect();

        Self {
            openapi: config.openapi.clone(),
            info: Info {
                title: config.title.clone(),
                version: config.version.clone(),
                description: config.description.clone(),
            },
            paths,
            components: Components { schemas },
        }
    }
}

fn convert_operation(op: &OperationDescriptor, config: &ConverterConfig) -> Operation {
    Operation {
        description: op.description.clone(),
        parameters: op.parameters.iter().map(convert_parameter).collect(),
        request_body: op
            .request_body
            .as_ref()
            .map(|body| convert_request_body(body, config)),
        responses: op
            .responses
            .iter()
            .map(|(status, response)| (status.clone(), convert_response(response, config)))
            .collect(),
    }
}

fn convert_parameter(param: &ParameterDescriptor) -> Parameter {
    Parameter {
        name: param.name.clone(),
        location: param.location.as_str().to_string(),
        required: param.required,
        description: param.description.clone(),
        schema: Schema::primitive(param.type_name),
    }
}

fn media_content(schema: &SchemaRef, config: &ConverterConfig) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(
        config.media_type.clone(),
        MediaType {
            schema: Schema::from(schema),
        },
    );
    content
}

fn convert_request_body(body: &RequestBodyDescriptor, config: &ConverterConfig) -> RequestBody {
    RequestBody {
        required: body.required,
        content: media_content(&body.schema, config),
    }
}

fn convert_response(response: &ResponseDescriptor, config: &ConverterConfig) -> Response {
    Response {
        description: response.description.clone(),
        content: response
            .content
            .as_ref()
            .map(|schema| media_content(schema, config))
            .unwrap_or_default(),
    }
}
