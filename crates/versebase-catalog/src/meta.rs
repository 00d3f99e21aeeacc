use serde::{Deserialize, Serialize};
use versebase_types::TableSchema;

/// Catalog entry: enough to reopen a table without reading its data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    pub filename: String,
    pub schema: TableSchema,
}

/// The catalog, persisted as JSON at `<data_root>/meta.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub tables: Vec<TableMeta>,
}
