//! Schema derivation from dotted-path field tables
//!
//! Each row's path is walked root first with a running schema name that
//! starts at the base name and grows by one capitalized segment per level:
//!
//! ```text
//! base = "GetUser", row = "address.geo.lat"
//!
//! GetUser           .address -> $ref GetUserAddress
//! GetUserAddress    .geo     -> $ref GetUserAddressGeo
//! GetUserAddressGeo .lat     -> float
//! ```
//!
//! Names depend only on the base name and the path prefix, so rows (and
//! whole tables) that share a prefix under the same base name land in the
//! same registry entry and extend it.

use crate::field_table::{strip_markers, FieldRow, FieldTableReader, PathSegment};
use crate::schema::{SchemaRef, SchemaRegistry};
use docs2oas_common::{Result, Table};

/// Uppercase the first character and lowercase the rest
/// (`billingAddress` becomes `Billingaddress`)
pub fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Uppercase every letter that follows a non-letter, lowercase the others
/// (`v1beta` becomes `V1Beta`, `userProfiles` becomes `Userprofiles`)
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut after_letter = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

/// Schema name for the object one level below `running_name` via `segment`
pub fn next_schema_name(running_name: &str, segment: &str) -> String {
    format!("{}{}", running_name, capitalize(&strip_markers(segment)))
}

/// Build the schema for `table` under `base_name` into `registry`.
///
/// All rows are read before the registry is touched, so a malformed table
/// or unknown type leaves the registry unchanged.
pub fn build_schema(
    registry: &mut SchemaRegistry,
    base_name: &str,
    table: &Table,
) -> Result<SchemaRef> {
    SchemaBuilder::new(registry).build(base_name, table)
}

/// Writes derived schemas into a registry
pub struct SchemaBuilder<'r> {
    registry: &'r mut SchemaRegistry,
}

impl<'r> SchemaBuilder<'r> {
    pub fn new(registry: &'r mut SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Read `table` and add its rows under `base_name`
    pub fn build(&mut self, base_name: &str, table: &Table) -> Result<SchemaRef> {
        let rows = FieldTableReader::new(table).read_all()?;
        Ok(self.build_from_rows(base_name, &rows))
    }

    /// Add already-read rows under `base_name`.
    ///
    /// The root entry exists afterwards even when `rows` is empty.
    pub fn build_from_rows(&mut self, base_name: &str, rows: &[FieldRow]) -> SchemaRef {
        self.registry.entry(base_name);
        for row in rows {
            self.add_row(base_name, row);
        }
        SchemaRef::named(base_name)
    }

    fn add_row(&mut self, base_name: &str, row: &FieldRow) {
        let segments: Vec<PathSegment> = row.segments().collect();
        let last = segments.len().saturating_sub(1);
        let mut running_name = base_name.to_string();

        for (i, segment) in segments.iter().enumerate() {
            let nested_name = next_schema_name(&running_name, &segment.name);

            let target = if i == last {
                SchemaRef::Primitive(row.type_name)
            } else {
                SchemaRef::named(nested_name.as_str())
            };
            let value = if segment.array {
                SchemaRef::array_of(target)
            } else {
                target
            };

            self.registry
                .entry(&running_name)
                .add_property(&segment.name, value, !segment.optional);

            running_name = nested_name;
        }
    }
}
