use tabled::builder::Builder;
use tabled::Style;

use versebase_catalog::Database;
use versebase_table::Table;
use versebase_types::{DataType, DataTypeTag, Field, Row};

use crate::ast::{Command, Literal};
use crate::error::QueryError;

/// What running a [`Command`] against a [`Database`] produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    /// A `Select`'s matching rows, already narrowed to the requested
    /// field subset, in the order `Table::select` returned them.
    Rows { header: Vec<String>, rows: Vec<Vec<String>> },
    /// An `Insert`'s assigned id.
    Created { id: i32 },
    /// The number of rows an `Update` or `Delete` affected (0 or 1).
    Count(u64),
    /// A `CreateTable` or `DropTable` that has no row-shaped result.
    Ack,
}

impl ExecResult {
    /// Renders a `Rows` result as a `psql`-style grid with a header row,
    /// for display in whatever surface calls the executor.
    pub fn render(&self) -> Option<String> {
        let (header, rows) = match self {
            ExecResult::Rows { header, rows } => (header, rows),
            _ => return None,
        };
        let mut builder = Builder::default();
        builder.set_columns(header.clone());
        for row in rows {
            builder.add_record(row.clone());
        }
        Some(builder.build().with(Style::psql()).to_string())
    }
}

fn coerce(literal: &Literal, expected: DataTypeTag) -> Result<DataType, QueryError> {
    match (literal, expected) {
        (Literal::Int(v), DataTypeTag::Int) => Ok(DataType::Int(*v)),
        (Literal::Str(v), DataTypeTag::Str) => Ok(DataType::Str(v.clone())),
        (Literal::Bool(v), DataTypeTag::Bool) => Ok(DataType::Bool(*v)),
        (Literal::DateTime(v), DataTypeTag::DateTime) => Ok(DataType::DateTime(*v)),
        (other, expected) => Err(QueryError::TypeMismatch {
            expected,
            found: other.tag(),
        }),
    }
}

fn display_value(value: &DataType) -> String {
    match value {
        DataType::Int(v) => v.to_string(),
        DataType::Bool(v) => v.to_string(),
        DataType::Str(v) => v.clone(),
        DataType::DateTime(v) => v.to_rfc3339(),
    }
}

fn lookup_table<'a>(db: &'a mut Database, name: &str) -> Result<&'a mut Table, QueryError> {
    db.get_table_mut(name).ok_or_else(|| QueryError::NoSuchTable(name.to_owned()))
}

/// Runs one [`Command`] against `db`, translating it to the matching
/// [`versebase_catalog::Database`]/[`versebase_table::Table`] call.
pub fn execute(db: &mut Database, command: Command) -> Result<ExecResult, QueryError> {
    match command {
        Command::Select { table, fields, conditions } => {
            let t = lookup_table(db, &table)?;

            let mut typed_conditions = Vec::with_capacity(conditions.len());
            for (name, literal) in &conditions {
                let field = t.schema().get(name).ok_or_else(|| QueryError::NoSuchField(name.clone()))?;
                typed_conditions.push((name.clone(), coerce(literal, field.datatype)?));
            }
            let filter: Vec<(&str, &DataType)> = typed_conditions.iter().map(|(n, v)| (n.as_str(), v)).collect();
            let matched = t.select(&filter)?;

            let header = if fields.is_empty() {
                t.schema().field_names().map(str::to_owned).collect()
            } else {
                for name in &fields {
                    if !t.schema().contains(name) {
                        return Err(QueryError::NoSuchField(name.clone()));
                    }
                }
                fields
            };

            let rows = matched
                .iter()
                .map(|row| header.iter().map(|f| row.get(f).map(display_value).unwrap_or_default()).collect())
                .collect();
            Ok(ExecResult::Rows { header, rows })
        }

        Command::Insert { table, values } => {
            let t = lookup_table(db, &table)?;
            let mut row = Row::new();
            row.set_id(-1); // sentinel; Table::create assigns the real id
            for (name, literal) in &values {
                let field = t.schema().get(name).ok_or_else(|| QueryError::NoSuchField(name.clone()))?;
                row.set(name.clone(), coerce(literal, field.datatype)?);
            }
            let id = t.create(row)?;
            Ok(ExecResult::Created { id })
        }

        Command::Update { table, updates, id } => {
            if updates.contains_key("id") {
                return Err(QueryError::IdUpdateNotAllowed);
            }
            let t = lookup_table(db, &table)?;
            let mut row = t.get(id)?;
            for (name, literal) in &updates {
                let field = t.schema().get(name).ok_or_else(|| QueryError::NoSuchField(name.clone()))?;
                row.set(name.clone(), coerce(literal, field.datatype)?);
            }
            let count = t.update(row)?;
            Ok(ExecResult::Count(count))
        }

        Command::Delete { table, id } => {
            let t = lookup_table(db, &table)?;
            let count = t.delete(id)?;
            Ok(ExecResult::Count(count))
        }

        Command::CreateTable { table, fields } => {
            let fields = fields.into_iter().map(|(name, tag)| Field::new(name, tag, false)).collect();
            db.create_table(&table, fields)?;
            Ok(ExecResult::Ack)
        }

        Command::DropTable { table } => {
            db.delete_table(&table)?;
            Ok(ExecResult::Ack)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn create_users_table(db: &mut Database) {
        execute(
            db,
            Command::CreateTable {
                table: "users".into(),
                fields: vec![("id".into(), DataTypeTag::Int), ("name".into(), DataTypeTag::Str)],
            },
        )
        .unwrap();
    }

    fn insert_name(db: &mut Database, name: &str) -> i32 {
        let mut values = IndexMap::new();
        values.insert("name".to_string(), Literal::Str(name.to_owned()));
        match execute(db, Command::Insert { table: "users".into(), values }).unwrap() {
            ExecResult::Created { id } => id,
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn create_insert_select_round_trip() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path()).unwrap();
        create_users_table(&mut db);
        let id = insert_name(&mut db, "Zoe");
        assert_eq!(id, 0);

        let result = execute(
            &mut db,
            Command::Select {
                table: "users".into(),
                fields: vec!["id".into(), "name".into()],
                conditions: IndexMap::new(),
            },
        )
        .unwrap();

        match &result {
            ExecResult::Rows { header, rows } => {
                assert_eq!(header, &vec!["id".to_string(), "name".to_string()]);
                assert_eq!(rows, &vec![vec!["0".to_string(), "Zoe".to_string()]]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        let rendered = result.render().unwrap();
        assert!(rendered.contains("Zoe"));
        assert!(rendered.contains("id"));
    }

    #[test]
    fn select_with_condition_filters_and_sorts_by_id() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path()).unwrap();
        create_users_table(&mut db);
        insert_name(&mut db, "Alice");
        insert_name(&mut db, "Bob");
        insert_name(&mut db, "Alice");

        let mut conditions = IndexMap::new();
        conditions.insert("name".to_string(), Literal::Str("Alice".into()));
        let result = execute(
            &mut db,
            Command::Select {
                table: "users".into(),
                fields: vec![],
                conditions,
            },
        )
        .unwrap();

        match result {
            ExecResult::Rows { rows, .. } => {
                let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
                assert_eq!(ids, vec!["0", "2"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn update_rejects_id_mutation() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path()).unwrap();
        create_users_table(&mut db);
        insert_name(&mut db, "Alice");

        let mut updates = IndexMap::new();
        updates.insert("id".to_string(), Literal::Int(99));
        let err = execute(&mut db, Command::Update { table: "users".into(), updates, id: 0 }).unwrap_err();
        assert!(matches!(err, QueryError::IdUpdateNotAllowed));
    }

    #[test]
    fn delete_then_get_reports_zero() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path()).unwrap();
        create_users_table(&mut db);
        insert_name(&mut db, "Alice");

        let result = execute(&mut db, Command::Delete { table: "users".into(), id: 0 }).unwrap();
        assert_eq!(result, ExecResult::Count(1));

        let result = execute(&mut db, Command::Delete { table: "users".into(), id: 0 }).unwrap();
        assert_eq!(result, ExecResult::Count(0));
    }

    #[test]
    fn select_on_missing_table_fails() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path()).unwrap();
        let err = execute(
            &mut db,
            Command::Select {
                table: "ghost".into(),
                fields: vec![],
                conditions: IndexMap::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::NoSuchTable(_)));
    }
}
