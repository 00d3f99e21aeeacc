use thiserror::Error;
use versebase_types::DataTypeTag;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no such table `{0}`")]
    NoSuchTable(String),
    #[error("no such field `{0}`")]
    NoSuchField(String),
    #[error("value type does not match field type: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: DataTypeTag, found: DataTypeTag },
    #[error("updates must not modify the `id` field")]
    IdUpdateNotAllowed,
    #[error(transparent)]
    Table(#[from] versebase_table::TableError),
    #[error(transparent)]
    Catalog(#[from] versebase_catalog::CatalogError),
}
