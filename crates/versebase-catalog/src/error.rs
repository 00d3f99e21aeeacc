use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("table `{0}` already exists")]
    AlreadyExists(String),
    #[error("no table named `{0}`")]
    NotFound(String),
    #[error(transparent)]
    Schema(#[from] versebase_types::SchemaError),
    #[error(transparent)]
    Table(#[from] versebase_table::TableError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
