use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no row with id {0}")]
    NotFound(i32),
    #[error("index entry for id {0} points at a record whose stored id does not match")]
    IndexCorrupt(i32),
    #[error("update requires a row with its `id` field already set")]
    MissingId,
    #[error("table is closed")]
    Closed,
    #[error(transparent)]
    Storage(#[from] versebase_storage::StorageError),
    #[error(transparent)]
    Index(#[from] versebase_storage::IndexError),
}
