//! Named object schemas and the registry that accumulates them

use docs2oas_common::PrimitiveType;
use indexmap::{IndexMap, IndexSet};

/// Value of a property inside an object schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRef {
    Primitive(PrimitiveType),
    ArrayOf(Box<SchemaRef>),
    /// Reference to a registry entry by name
    NamedRef(String),
}

impl SchemaRef {
    pub fn named(name: impl Into<String>) -> Self {
        SchemaRef::NamedRef(name.into())
    }

    pub fn array_of(items: SchemaRef) -> Self {
        SchemaRef::ArrayOf(Box::new(items))
    }

    /// Name of the referenced schema, looking through arrays
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            SchemaRef::NamedRef(name) => Some(name),
            SchemaRef::ArrayOf(items) => items.referenced_name(),
            SchemaRef::Primitive(_) => None,
        }
    }
}

/// An object schema
///
/// Entries are append-only: properties are inserted or updated in place and
/// `required` only ever grows, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDef {
    pub name: String,
    pub properties: IndexMap<String, SchemaRef>,
    pub required: IndexSet<String>,
}

impl SchemaDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
            required: IndexSet::new(),
        }
    }

    /// Record a property. A redeclared property keeps its position.
    pub fn add_property(&mut self, name: &str, schema: SchemaRef, required: bool) {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.insert(name.to_string());
        }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

/// All named schemas produced during one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaDef>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaDef> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// The schema named `name`, created empty on first use
    pub fn entry(&mut self, name: &str) -> &mut SchemaDef {
        self.schemas
            .entry(name.to_string())
            .or_insert_with(|| SchemaDef::new(name))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schemas in creation order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDef> {
        self.schemas.values()
    }
}
