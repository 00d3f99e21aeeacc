//! The table catalog: owns the set of open tables and the JSON metadata
//! that lets them be reopened without reading their data files.

pub mod error;
mod meta;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use versebase_table::Table;
use versebase_types::Field;

pub use error::CatalogError;
pub use meta::{Metadata, TableMeta};

const META_FILENAME: &str = "meta.json";

/// Owns a `data_root` directory containing `meta.json` plus one data file
/// and one index file per table (`table_<name>.dat`,
/// `table_<name>.dat.idx`). Tables are kept in a name-sorted map so
/// iteration order is deterministic.
pub struct Database {
    data_root: PathBuf,
    meta: Metadata,
    tables: BTreeMap<String, Table>,
}

impl Database {
    /// Reads `meta.json` if it exists, writing an empty one otherwise, then
    /// opens every table it references.
    pub fn open(data_root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let data_root = data_root.as_ref().to_path_buf();
        fs::create_dir_all(&data_root)?;

        let meta_path = data_root.join(META_FILENAME);
        let meta: Metadata = if meta_path.exists() {
            let text = fs::read_to_string(&meta_path)?;
            serde_json::from_str(&text)?
        } else {
            let empty = Metadata::default();
            fs::write(&meta_path, serde_json::to_string_pretty(&empty)?)?;
            empty
        };

        let mut tables = BTreeMap::new();
        for entry in &meta.tables {
            let data_path = data_root.join(&entry.filename);
            let index_path = data_root.join(format!("{}.idx", entry.filename));
            let table = Table::open(data_path, index_path, entry.schema.clone())?;
            tables.insert(entry.name.clone(), table);
        }

        log::debug!("opened database at {} with {} tables", data_root.display(), tables.len());
        Ok(Self { data_root, meta, tables })
    }

    fn meta_path(&self) -> PathBuf {
        self.data_root.join(META_FILENAME)
    }

    fn flush_meta(&self) -> Result<(), CatalogError> {
        let text = serde_json::to_string_pretty(&self.meta)?;
        fs::write(self.meta_path(), text)?;
        Ok(())
    }

    /// Appends a `TableMeta`, flushes `meta.json`, and opens a fresh empty
    /// table. Fails with [`CatalogError::AlreadyExists`] if `name` is
    /// already in the catalog.
    pub fn create_table(&mut self, name: &str, fields: Vec<Field>) -> Result<&mut Table, CatalogError> {
        if self.meta.tables.iter().any(|t| t.name == name) {
            return Err(CatalogError::AlreadyExists(name.to_owned()));
        }
        let schema = versebase_types::TableSchema::new(fields)?;

        let filename = format!("table_{name}.dat");
        self.meta.tables.push(TableMeta {
            name: name.to_owned(),
            filename: filename.clone(),
            schema: schema.clone(),
        });
        self.flush_meta()?;

        let data_path = self.data_root.join(&filename);
        let index_path = self.data_root.join(format!("{filename}.idx"));
        let table = Table::open(data_path, index_path, schema)?;
        self.tables.insert(name.to_owned(), table);
        Ok(self.tables.get_mut(name).expect("just inserted"))
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Removes `name` from the catalog. `meta.json` is flushed with the
    /// entry already gone *before* the data/index files are unlinked: a
    /// crash between the two leaves orphan files on disk (harmless, since a
    /// later reopen will not re-acquire them), rather than a catalog entry
    /// that points at files which no longer exist.
    pub fn delete_table(&mut self, name: &str) -> Result<(), CatalogError> {
        let idx = self
            .meta
            .tables
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_owned()))?;
        let removed = self.meta.tables.remove(idx);
        self.flush_meta()?;

        if let Some(mut table) = self.tables.remove(name) {
            if let Err(e) = table.close() {
                log::warn!("error closing table `{name}` before drop: {e}");
            }
        }

        let data_path = self.data_root.join(&removed.filename);
        let index_path = self.data_root.join(format!("{}.idx", removed.filename));
        fs::remove_file(&data_path)?;
        fs::remove_file(&index_path)?;
        Ok(())
    }
}
