//! Header, query and path parameters

use crate::field_table::{FieldRow, FieldTableReader};
use crate::table_after;
use docs2oas_common::{
    ConversionError, NodeTree, PrimitiveType, RequiredStyle, Result, Table,
};

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Header,
    Query,
    Path,
}

impl ParameterLocation {
    /// Groups in the order they contribute parameters
    pub const ALL: [ParameterLocation; 3] = [
        ParameterLocation::Header,
        ParameterLocation::Query,
        ParameterLocation::Path,
    ];

    /// Text of the `####` heading introducing the group's table
    pub fn heading(&self) -> &'static str {
        match self {
            ParameterLocation::Header => "Headers",
            ParameterLocation::Query => "Query",
            ParameterLocation::Path => "Path",
        }
    }

    /// Value of the OpenAPI `in` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Header => "header",
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub type_name: PrimitiveType,
    pub description: String,
}

/// Reads the parameter tables of a document
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterExtractor {
    style: RequiredStyle,
}

impl ParameterExtractor {
    pub fn new(style: RequiredStyle) -> Self {
        Self { style }
    }

    /// Parameters from every present group, headers first, then query, then
    /// path. A missing group contributes nothing.
    pub fn extract(&self, tree: &NodeTree) -> Result<Vec<ParameterDescriptor>> {
        let mut parameters = Vec::new();
        for location in ParameterLocation::ALL {
            if let Some(index) = tree.find_heading(4, location.heading()) {
                let table = table_after(tree, index, location.heading())?;
                parameters.extend(self.read_group(table, location)?);
            }
        }
        Ok(parameters)
    }

    fn read_group(
        &self,
        table: &Table,
        location: ParameterLocation,
    ) -> Result<Vec<ParameterDescriptor>> {
        let reader = FieldTableReader::with_required_values(table);
        if self.style == RequiredStyle::Column && !reader.has_required_column() {
            return Err(ConversionError::MalformedTable(format!(
                "'{}' table has no Required column",
                location.heading()
            )));
        }

        reader
            .rows()
            .map(|row| {
                let row = row?;
                let required = self.is_required(&row, location)?;
                Ok(ParameterDescriptor {
                    name: row.name(),
                    location,
                    required,
                    type_name: row.type_name,
                    description: row.description,
                })
            })
            .collect()
    }

    fn is_required(&self, row: &FieldRow, location: ParameterLocation) -> Result<bool> {
        match self.style {
            RequiredStyle::Marker => Ok(!row.optional),
            RequiredStyle::Column => row.required.ok_or_else(|| {
                ConversionError::MalformedTable(format!(
                    "'{}' parameter '{}' has no Required value",
                    location.heading(),
                    row.name()
                ))
            }),
        }
    }
}
