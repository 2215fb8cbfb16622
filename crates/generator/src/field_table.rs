//! Reading field tables into typed rows
//!
//! Column 0 holds the dotted field path and column 1 the type name. A
//! `Description` and a `Required` column are located by header; without a
//! `Description` header the third column, if any, is the description.

use docs2oas_common::{ConversionError, PrimitiveType, Result, Table};

const OPTIONAL_MARKER: char = '?';
const ARRAY_MARKER: &str = "[]";

/// One row of a field table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    /// Dotted path as written, markers included
    pub path: String,
    pub type_name: PrimitiveType,
    /// Some segment of the path carries the `?` marker
    pub optional: bool,
    /// Some segment of the path carries the `[]` marker
    pub array_marked: bool,
    pub description: String,
    /// Value of an explicit `Required` column, when the table has one
    pub required: Option<bool>,
}

/// One `.`-separated segment of a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Segment name with markers stripped
    pub name: String,
    pub optional: bool,
    pub array: bool,
}

impl PathSegment {
    pub fn parse(raw: &str) -> Self {
        Self {
            name: strip_markers(raw),
            optional: raw.contains(OPTIONAL_MARKER),
            array: raw.contains(ARRAY_MARKER),
        }
    }
}

/// Remove the optional and array markers from a name
pub fn strip_markers(raw: &str) -> String {
    raw.replace(ARRAY_MARKER, "")
        .replace(OPTIONAL_MARKER, "")
        .trim()
        .to_string()
}

impl FieldRow {
    /// Path segments in order, root first
    pub fn segments(&self) -> impl Iterator<Item = PathSegment> + '_ {
        self.path.split('.').map(PathSegment::parse)
    }

    /// The path with markers stripped
    pub fn name(&self) -> String {
        strip_markers(&self.path)
    }
}

/// Reads a table's rows as [`FieldRow`]s in source order
#[derive(Debug, Clone, Copy)]
pub struct FieldTableReader<'a> {
    table: &'a Table,
    description_column: Option<usize>,
    required_column: Option<usize>,
    read_required: bool,
}

impl<'a> FieldTableReader<'a> {
    /// Reader for schema tables. A `Required` column is skipped; only the
    /// `?` marker decides whether a field is required.
    pub fn new(table: &'a Table) -> Self {
        Self::build(table, false)
    }

    /// Reader for parameter tables, where a `Required` column is read and
    /// its values validated into [`FieldRow::required`].
    pub fn with_required_values(table: &'a Table) -> Self {
        Self::build(table, true)
    }

    fn build(table: &'a Table, read_required: bool) -> Self {
        let required_column = table.column(&["required"]);
        let description_column = table
            .column(&["description", "desc"])
            .or_else(|| (table.headers.len() > 2 && required_column != Some(2)).then_some(2));

        Self {
            table,
            description_column,
            required_column,
            read_required,
        }
    }

    /// Whether the table carries an explicit `Required` column
    pub fn has_required_column(&self) -> bool {
        self.required_column.is_some()
    }

    /// Lazily read the rows. Each call starts again from the first row.
    pub fn rows(&self) -> impl Iterator<Item = Result<FieldRow>> + 'a {
        let reader = *self;
        let table: &'a Table = self.table;
        table
            .rows
            .iter()
            .enumerate()
            .map(move |(i, cells)| reader.read_row(i + 1, cells))
    }

    /// Read every row, failing on the first bad one
    pub fn read_all(&self) -> Result<Vec<FieldRow>> {
        self.rows().collect()
    }

    fn min_columns(&self) -> usize {
        match self.required_column {
            Some(col) if self.read_required => (col + 1).max(2),
            _ => 2,
        }
    }

    fn read_row(&self, row_number: usize, cells: &[String]) -> Result<FieldRow> {
        let expected = self.min_columns();
        if cells.len() < expected {
            return Err(ConversionError::MalformedTable(format!(
                "row {}: expected at least {} columns, found {}",
                row_number,
                expected,
                cells.len()
            )));
        }

        let path = cells[0].trim();
        if path.is_empty() {
            return Err(ConversionError::MalformedTable(format!(
                "row {}: empty field path",
                row_number
            )));
        }
        if path.split('.').any(|segment| strip_markers(segment).is_empty()) {
            return Err(ConversionError::MalformedTable(format!(
                "row {}: empty segment in field path '{}'",
                row_number, path
            )));
        }

        let type_name: PrimitiveType = cells[1].parse()?;

        let description = self
            .description_column
            .and_then(|col| cells.get(col))
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        let required = match self.required_column.filter(|_| self.read_required) {
            Some(col) => parse_yes_no(&cells[col]).map_err(|value| {
                ConversionError::MalformedTable(format!(
                    "row {}: invalid required value '{}' (expected yes or no)",
                    row_number, value
                ))
            })?,
            None => None,
        };

        Ok(FieldRow {
            path: path.to_string(),
            type_name,
            optional: path.contains(OPTIONAL_MARKER),
            array_marked: path.contains(ARRAY_MARKER),
            description,
            required,
        })
    }
}

/// `Ok(None)` for an empty cell, `Err(value)` for anything unrecognized
fn parse_yes_no(cell: &str) -> std::result::Result<Option<bool>, String> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "yes" | "y" | "true" => Ok(Some(true)),
        "no" | "n" | "false" => Ok(Some(false)),
        other => Err(other.to_string()),
    }
}
