//! OpenAPI generation from endpoint documents
//!
//! This crate turns parsed endpoint documents into a single OpenAPI 3.0
//! document: field tables become component schemas, parameter tables
//! become operation parameters, and operations are merged by path.

mod document;
mod field_table;
mod openapi;
mod operation;
mod parameters;
mod render;
mod schema;
mod schema_builder;

pub use docs2oas_common::DocumentFailure;
pub use document::{convert, ConversionReport, Converter, SpecDocument, SpecDocumentAssembler};
pub use field_table::{strip_markers, FieldRow, FieldTableReader, PathSegment};
pub use openapi::{
    Components, Info, MediaType, OpenApiDocument, Operation, Parameter, RequestBody, Response,
    Schema,
};
pub use operation::{
    Endpoint, HttpMethod, OperationAssembler, OperationDescriptor, RequestBodyDescriptor,
    ResponseClass, ResponseDescriptor,
};
pub use parameters::{ParameterDescriptor, ParameterExtractor, ParameterLocation};
pub use render::{render, OutputFormat};
pub use schema::{SchemaDef, SchemaRef, SchemaRegistry};
pub use schema_builder::{build_schema, capitalize, next_schema_name, title_case, SchemaBuilder};

use docs2oas_common::{ConversionError, NodeTree, Result, Table};

/// The table directly following the heading at `index`
pub(crate) fn table_after<'t>(tree: &'t NodeTree, index: usize, label: &str) -> Result<&'t Table> {
    tree.next_node(index)
        .and_then(|node| node.as_table())
        .ok_or_else(|| {
            ConversionError::MalformedTable(format!("'{}' heading is not followed by a table", label))
        })
}
