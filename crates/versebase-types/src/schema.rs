use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::DataTypeTag;

/// A named column. `nullable` is carried for forward compatibility with the
/// catalog's JSON shape, but is not honored by the on-disk format: only
/// non-null values are ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub datatype: DataTypeTag,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, datatype: DataTypeTag, nullable: bool) -> Self {
        Self {
            name: name.into(),
            datatype,
            nullable,
        }
    }
}

/// An ordered mapping from field name to [`Field`]. Field order is
/// significant (rows encode values in schema order) and is fixed at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    fields: IndexMap<String, Field>,
}

impl TableSchema {
    /// Builds a schema from `fields` in the given order, validating the
    /// canonical rule: at least one field, and exactly one of them named
    /// `id` with datatype `Int`.
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut map = IndexMap::with_capacity(fields.len());
        for field in fields {
            if map.insert(field.name.clone(), field.clone()).is_some() {
                return Err(SchemaError::DuplicateField(field.name));
            }
        }

        match map.get("id") {
            None => return Err(SchemaError::MissingId),
            Some(id_field) if id_field.datatype != DataTypeTag::Int => {
                return Err(SchemaError::WrongIdType(id_field.datatype));
            }
            Some(_) => {}
        }

        Ok(Self { fields: map })
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Position of the `id` field among the schema's fields, fixed at
    /// schema creation and preserved thereafter.
    pub fn id_position(&self) -> usize {
        self.fields.get_index_of("id").expect("id field validated at construction")
    }
}
