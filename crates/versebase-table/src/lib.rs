//! Per-table CRUD coordinator: owns one [`TableFile`] and one [`TableIndex`]
//! and keeps them consistent across create/update/delete.

pub mod error;

use std::path::Path;

use versebase_storage::{TableFile, TableIndex};
use versebase_types::{DataType, Row, TableSchema};

pub use error::TableError;

/// `Open -> Closed`. Only [`Table::close`] leaves `Open`; every other
/// operation requires the table to still be open.
pub struct Table {
    schema: TableSchema,
    file: TableFile,
    index: TableIndex,
    closed: bool,
}

impl Table {
    pub fn open(data_path: impl AsRef<Path>, index_path: impl AsRef<Path>, schema: TableSchema) -> Result<Self, TableError> {
        let file = TableFile::open(data_path, schema.clone())?;
        let index = TableIndex::open(index_path)?;
        Ok(Self {
            schema,
            file,
            index,
            closed: false,
        })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn ensure_open(&self) -> Result<(), TableError> {
        if self.closed {
            Err(TableError::Closed)
        } else {
            Ok(())
        }
    }

    /// Looks the row up via the index; fails with [`TableError::NotFound`]
    /// if absent, or [`TableError::IndexCorrupt`] if the record at the
    /// indexed offset does not carry the expected id.
    pub fn get(&mut self, id: i32) -> Result<Row, TableError> {
        self.ensure_open()?;
        let offset = self.index.get(id).ok_or(TableError::NotFound(id))?;
        self.file.seek(offset as i64)?;
        let (row, _begin, _end) = self.file.read_row()?.ok_or(TableError::IndexCorrupt(id))?;
        if row.id() != Some(id as i64) {
            return Err(TableError::IndexCorrupt(id));
        }
        Ok(row)
    }

    /// Full scan from the beginning of the file. A row matches iff every
    /// `(field, value)` pair in `filter` equals the row's value for that
    /// field. Results are sorted by id ascending, independent of physical
    /// layout.
    pub fn select(&mut self, filter: &[(&str, &DataType)]) -> Result<Vec<Row>, TableError> {
        self.ensure_open()?;
        self.file.seek(0)?;

        let mut matches = Vec::new();
        while let Some((row, _begin, _end)) = self.file.read_row()? {
            let is_match = filter.iter().all(|(field, value)| row.get(field) == Some(*value));
            if is_match {
                let id = row.id().expect("schema guarantees an id field") as i32;
                matches.push((id, row));
            }
        }
        matches.sort_by_key(|(id, _)| *id);
        Ok(matches.into_iter().map(|(_, row)| row).collect())
    }

    /// Assigns `row.id` from the index (ignoring any id already set on
    /// `row`), appends it, and records its offset. Returns the assigned id.
    pub fn create(&mut self, mut row: Row) -> Result<i32, TableError> {
        self.ensure_open()?;
        let id = self.index.get_next_id();
        row.set_id(id as i64);
        let (begin, _end) = self.file.write_row(&row)?;
        self.index.set(id, begin)?;
        Ok(id)
    }

    /// Deletes the existing record for `row.id` and re-appends `row` at
    /// end-of-file under the same id. Returns `0` if no row with that id
    /// existed, `1` otherwise.
    pub fn update(&mut self, row: Row) -> Result<u64, TableError> {
        self.ensure_open()?;
        let id = row.id().ok_or(TableError::MissingId)? as i32;

        if self.delete(id)? == 0 {
            return Ok(0);
        }
        let (begin, _end) = self.file.write_row(&row)?;
        self.index.set(id, begin)?;
        Ok(1)
    }

    /// Locates `id` via a full linear scan (deliberately bypassing the
    /// index), erases its record, and rebuilds the index from scratch.
    /// Returns `0` if no row with that id existed, `1` otherwise.
    pub fn delete(&mut self, id: i32) -> Result<u64, TableError> {
        self.ensure_open()?;
        match self.find(id)? {
            None => Ok(0),
            Some((_row, begin, end)) => {
                self.file.erase(begin, end)?;
                self.refresh_indexes()?;
                Ok(1)
            }
        }
    }

    /// Sequential scan for the first record whose id matches.
    pub fn find(&mut self, id: i32) -> Result<Option<(Row, u64, u64)>, TableError> {
        self.ensure_open()?;
        self.file.seek(0)?;
        while let Some((row, begin, end)) = self.file.read_row()? {
            if row.id() == Some(id as i64) {
                return Ok(Some((row, begin, end)));
            }
        }
        Ok(None)
    }

    /// Clears the index, scans the whole file, and re-records `(id, begin)`
    /// for every surviving row.
    pub fn refresh_indexes(&mut self) -> Result<(), TableError> {
        self.ensure_open()?;
        self.index.clear()?;
        self.file.seek(0)?;
        while let Some((row, begin, _end)) = self.file.read_row()? {
            let id = row.id().expect("schema guarantees an id field") as i32;
            self.index.set(id, begin)?;
        }
        Ok(())
    }

    /// Flushes both files. Idempotent; errors are logged, not propagated.
    /// Shutdown does not abort on a failed flush.
    pub fn close(&mut self) -> Result<(), TableError> {
        if self.closed {
            return Ok(());
        }
        if let Err(e) = self.file.close() {
            log::warn!("error flushing table file: {e}");
        }
        if let Err(e) = self.index.close() {
            log::warn!("error flushing table index: {e}");
        }
        self.closed = true;
        Ok(())
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use versebase_types::{DataTypeTag, Field};

    fn schema() -> TableSchema {
        TableSchema::new(vec![Field::new("id", DataTypeTag::Int, false), Field::new("name", DataTypeTag::Str, false)])
            .unwrap()
    }

    fn open_table(dir: &Path) -> Table {
        Table::open(dir.join("t.dat"), dir.join("t.dat.idx"), schema()).unwrap()
    }

    fn name_row(name: &str) -> Row {
        Row::new().with("name", DataType::Str(name.to_owned()))
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let dir = tempdir().unwrap();
        let mut table = open_table(dir.path());
        assert_eq!(table.create(name_row("Alice")).unwrap(), 0);
        assert_eq!(table.create(name_row("Bob")).unwrap(), 1);
        assert_eq!(table.create(name_row("Alice")).unwrap(), 2);
    }

    #[test]
    fn select_matches_and_sorts_by_id() {
        let dir = tempdir().unwrap();
        let mut table = open_table(dir.path());
        table.create(name_row("Alice")).unwrap();
        table.create(name_row("Bob")).unwrap();
        table.create(name_row("Alice")).unwrap();

        let filter_value = DataType::Str("Alice".into());
        let rows = table.select(&[("name", &filter_value)]).unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id().unwrap()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn update_relocates_record_preserving_id() {
        let dir = tempdir().unwrap();
        let mut table = open_table(dir.path());
        let id = table.create(name_row("Alice")).unwrap();

        let mut updated = name_row("Bob");
        updated.set_id(id as i64);
        assert_eq!(table.update(updated).unwrap(), 1);

        let got = table.get(id).unwrap();
        assert_eq!(got.get("name"), Some(&DataType::Str("Bob".into())));

        let (_, begin, _) = table.find(id).unwrap().unwrap();
        assert_eq!(table.index_offset_for_test(id), Some(begin));
    }

    #[test]
    fn update_of_missing_row_is_noop() {
        let dir = tempdir().unwrap();
        let mut table = open_table(dir.path());
        let mut row = name_row("Ghost");
        row.set_id(7);
        assert_eq!(table.update(row).unwrap(), 0);
    }

    #[test]
    fn delete_rebuilds_index_for_survivors() {
        let dir = tempdir().unwrap();
        let mut table = open_table(dir.path());
        for name in ["a", "b", "c", "d", "e"] {
            table.create(name_row(name)).unwrap();
        }

        assert_eq!(table.delete(2).unwrap(), 1);
        assert!(matches!(table.get(2), Err(TableError::NotFound(2))));

        let rows = table.select(&[]).unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id().unwrap()).collect();
        assert_eq!(ids, vec![0, 1, 3, 4]);
    }

    #[test]
    fn delete_of_missing_row_is_noop() {
        let dir = tempdir().unwrap();
        let mut table = open_table(dir.path());
        assert_eq!(table.delete(0).unwrap(), 0);
    }

    impl Table {
        fn index_offset_for_test(&self, id: i32) -> Option<u64> {
            self.index.get(id)
        }
    }
}
