use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use versebase_types::DataTypeTag;

/// A raw value as produced by a parser, before it has been checked against
/// any particular schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bool(bool),
    DateTime(DateTime<Utc>),
}

impl Literal {
    pub fn tag(&self) -> DataTypeTag {
        match self {
            Literal::Int(_) => DataTypeTag::Int,
            Literal::Str(_) => DataTypeTag::Str,
            Literal::Bool(_) => DataTypeTag::Bool,
            Literal::DateTime(_) => DataTypeTag::DateTime,
        }
    }
}

/// A tagged command the executor accepts, produced by whatever parser sits
/// in front of this crate (the grammar itself is out of scope here).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select {
        table: String,
        fields: Vec<String>,
        conditions: IndexMap<String, Literal>,
    },
    Insert {
        table: String,
        values: IndexMap<String, Literal>,
    },
    Update {
        table: String,
        updates: IndexMap<String, Literal>,
        id: i32,
    },
    Delete {
        table: String,
        id: i32,
    },
    CreateTable {
        table: String,
        fields: Vec<(String, DataTypeTag)>,
    },
    DropTable {
        table: String,
    },
}
