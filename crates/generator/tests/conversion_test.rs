//! Integration test for markdown to OpenAPI conversion

use docs2oas_common::{ConversionError, ConverterConfig, NodeTree};
use docs2oas_generator::{
    render, Converter, HttpMethod, OpenApiDocument, OutputFormat, SchemaRef,
};
use docs2oas_parser::{DirectorySource, MarkdownParser};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const GET_USER: &str = r#"# GET /users/{user_id}
## description: Fetch one user

#### Path
| Field   | Type    | Description |
|---------|---------|-------------|
| user_id | integer | User id     |

#### Query
| Field     | Type    | Description        |
|-----------|---------|--------------------|
| expand?   | boolean | Include relations  |

### Responses
#### 200 OK
Content

| Field           | Type    | Description |
|-----------------|---------|-------------|
| id              | integer | User id     |
| name            | string  | Full name   |
| address.street  | string  | Street      |
| address.geo.lat | float   | Latitude    |
| tags[]?         | string  | Labels      |

#### 404
"#;

const CREATE_USER: &str = r#"# POST /users/{user_id}
## description: Replace a user

#### Body
| Field         | Type   | Description |
|---------------|--------|-------------|
| name          | string | Full name   |
| roles[].name  | string | Role        |

### Responses
#### 204
"#;

const BROKEN: &str = r#"# GET /broken
## description: Uses a type nobody knows

#### Body
| Field | Type     | Description |
|-------|----------|-------------|
| at    | datetime | Timestamp   |
"#;

fn parse(source: &str, text: &str) -> NodeTree {
    MarkdownParser::new(source, text).parse()
}

fn to_json(report: &docs2oas_generator::ConversionReport) -> serde_json::Value {
    let document = OpenApiDocument::from_spec(&report.document, &ConverterConfig::default());
    let text = render(&document, OutputFormat::Json).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_convert_get_user() {
    let report = Converter::default().convert(&[parse("get_user.md", GET_USER)]);
    assert!(report.is_clean());

    assert_eq!(
        to_json(&report),
        json!({
            "openapi": "3.0.0",
            "info": {"title": "API", "version": "0.1.0"},
            "paths": {
                "/users/{user_id}": {
                    "get": {
                        "description": "Fetch one user",
                        "parameters": [
                            {
                                "name": "expand",
                                "in": "query",
                                "required": false,
                                "description": "Include relations",
                                "schema": {"type": "boolean"}
                            },
                            {
                                "name": "user_id",
                                "in": "path",
                                "required": true,
                                "description": "User id",
                                "schema": {"type": "integer"}
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Success 200",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/GetUsersUserIdResponse200Content"
                                        }
                                    }
                                }
                            },
                            "404": {"description": "Error 404"}
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "GetUsersUserIdResponse200Content": {
                        "type": "object",
                        "required": ["id", "name", "address"],
                        "properties": {
                            "id": {"type": "integer"},
                            "name": {"type": "string"},
                            "address": {
                                "$ref": "#/components/schemas/GetUsersUserIdResponse200ContentAddress"
                            },
                            "tags": {"type": "array", "items": {"type": "string"}}
                        }
                    },
                    "GetUsersUserIdResponse200ContentAddress": {
                        "type": "object",
                        "required": ["street", "geo"],
                        "properties": {
                            "street": {"type": "string"},
                            "geo": {
                                "$ref": "#/components/schemas/GetUsersUserIdResponse200ContentAddressGeo"
                            }
                        }
                    },
                    "GetUsersUserIdResponse200ContentAddressGeo": {
                        "type": "object",
                        "required": ["lat"],
                        "properties": {
                            "lat": {"type": "number", "format": "float"}
                        }
                    }
                }
            }
        })
    );
}

#[test]
fn test_rendered_key_order_follows_rows() {
    let report = Converter::default().convert(&[parse("get_user.md", GET_USER)]);
    let document = OpenApiDocument::from_spec(&report.document, &ConverterConfig::default());

    let content = &document.components.schemas["GetUsersUserIdResponse200Content"];
    let keys: Vec<&str> = content
        .properties
        .as_ref()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["id", "name", "address", "tags"]);

    let yaml = render(&document, OutputFormat::Yaml).unwrap();
    let id = yaml.find("      id:").unwrap();
    let tags = yaml.find("      tags:").unwrap();
    assert!(id < tags);
}

#[test]
fn test_methods_share_path_item() {
    let report = Converter::default().convert(&[
        parse("get_user.md", GET_USER),
        parse("create_user.md", CREATE_USER),
    ]);
    assert!(report.is_clean());

    let methods: Vec<HttpMethod> = report.document.paths["/users/{user_id}"]
        .keys()
        .copied()
        .collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);

    let post = report
        .document
        .operation("/users/{user_id}", HttpMethod::Post)
        .unwrap();
    let body = post.request_body.as_ref().unwrap();
    assert_eq!(body.schema, SchemaRef::named("PostUsersUserIdRequestBody"));

    let json = to_json(&report);
    assert_eq!(
        json["components"]["schemas"]["PostUsersUserIdRequestBody"]["properties"]["roles"],
        json!({
            "type": "array",
            "items": {"$ref": "#/components/schemas/PostUsersUserIdRequestBodyRoles"}
        })
    );
    assert_eq!(
        json["paths"]["/users/{user_id}"]["post"]["requestBody"]["required"],
        json!(true)
    );
}

#[test]
fn test_bad_document_is_skipped() {
    let report = Converter::default().convert(&[
        parse("get_user.md", GET_USER),
        parse("broken.md", BROKEN),
        parse("create_user.md", CREATE_USER),
    ]);

    assert_eq!(report.document.operation_count(), 2);
    assert!(!report.document.paths.contains_key("/broken"));
    assert!(!report.document.schemas.contains("GetBrokenRequestBody"));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, "broken.md");
    assert!(matches!(
        report.failures[0].error,
        ConversionError::UnknownType(ref name) if name == "datetime"
    ));
}

#[test]
fn test_convert_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("users")).unwrap();
    fs::write(dir.path().join("users/get_user.md"), GET_USER).unwrap();
    fs::write(dir.path().join("users/create_user.md"), CREATE_USER).unwrap();
    fs::write(dir.path().join("notes.txt"), "not an endpoint").unwrap();

    let config = ConverterConfig::default()
        .with_title("Users")
        .with_version("2.1.0");
    let converter = Converter::new(config.clone());
    let report = converter
        .convert_source(&DirectorySource::new(dir.path()))
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.document.operation_count(), 2);

    let document = OpenApiDocument::from_spec(&report.document, converter.config());
    assert_eq!(document.info.title, "Users");
    assert_eq!(document.info.version, "2.1.0");

    let yaml = render(&document, OutputFormat::Yaml).unwrap();
    let parsed: OpenApiDocument = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, document);
}

#[test]
fn test_missing_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = Converter::default().convert_source(&DirectorySource::new(dir.path().join("nope")));
    assert!(result.is_err());
}

#[test]
fn test_unreadable_file_does_not_abort_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a_get_user.md"), GET_USER).unwrap();
    let bad = dir.path().join("b_bad.md");
    fs::write(&bad, [b'#', b' ', 0xff, 0xfe]).unwrap();

    let report = Converter::default()
        .convert_source(&DirectorySource::new(dir.path()))
        .unwrap();

    assert!(report
        .document
        .operation("/users/{user_id}", HttpMethod::Get)
        .is_some());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, bad.display().to_string());
    assert!(matches!(report.failures[0].error, ConversionError::Io(_)));
}
