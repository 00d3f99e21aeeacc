use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::IndexError;

const ENTRY_SIZE: usize = 12; // i32 id + u64 offset

/// Persistent sorted mapping from row id to the byte offset at which the
/// row begins in the table's data file. Backed by a sorted in-memory map
/// and a flat file of fixed-size `(id: i32 LE, offset: u64 LE)` entries.
pub struct TableIndex {
    file: File,
    path: PathBuf,
    entries: BTreeMap<i32, u64>,
}

impl TableIndex {
    /// Opens `path`, loading any existing entries, or creates it empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).write(true).create(true).open(&path)?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;
        if raw.len() % ENTRY_SIZE != 0 {
            log::error!("index file {} has corrupt length {}", path.display(), raw.len());
            return Err(IndexError::Corrupt(raw.len() as u64));
        }

        let mut entries = BTreeMap::new();
        for chunk in raw.chunks_exact(ENTRY_SIZE) {
            let id = i32::from_le_bytes(chunk[0..4].try_into().unwrap());
            let offset = u64::from_le_bytes(chunk[4..12].try_into().unwrap());
            entries.insert(id, offset);
        }

        log::debug!("loaded index {} with {} entries", path.display(), entries.len());
        Ok(Self { file, path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, id: i32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: i32) -> Option<u64> {
        self.entries.get(&id).copied()
    }

    pub fn set(&mut self, id: i32, offset: u64) -> Result<(), IndexError> {
        self.entries.insert(id, offset);
        self.persist()
    }

    pub fn delete(&mut self, id: i32) -> Result<Option<u64>, IndexError> {
        let prev = self.entries.remove(&id);
        self.persist()?;
        Ok(prev)
    }

    pub fn clear(&mut self) -> Result<(), IndexError> {
        self.entries.clear();
        self.persist()
    }

    /// `max(ids) + 1`, or `0` when the index is empty.
    pub fn get_next_id(&self) -> i32 {
        self.entries.keys().next_back().map(|max| max + 1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.entries.iter().map(|(id, offset)| (*id, *offset))
    }

    /// Rewrites the whole file from the in-memory map, in ascending id
    /// order. `O(n)` per mutation, intentional for simplicity; an
    /// implementation may batch persistence so long as the file matches the
    /// in-memory map by the time [`Self::close`] returns.
    fn persist(&mut self) -> Result<(), IndexError> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::with_capacity(self.entries.len() * ENTRY_SIZE);
        for (id, offset) in &self.entries {
            buf.extend_from_slice(&id.to_le_bytes());
            buf.extend_from_slice(&offset.to_le_bytes());
        }
        self.file.write_all(&buf)?;
        self.file.set_len(buf.len() as u64)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), IndexError> {
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn empty_index_next_id_is_zero() {
        let dir = tempdir().unwrap();
        let index = TableIndex::open(dir.path().join("t.dat.idx")).unwrap();
        assert_eq!(index.get_next_id(), 0);
    }

    #[test]
    fn set_get_delete_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.dat.idx");
        let mut index = TableIndex::open(&path).unwrap();
        index.set(0, 10).unwrap();
        index.set(1, 20).unwrap();
        assert_eq!(index.get(0), Some(10));
        assert_eq!(index.get_next_id(), 2);

        index.delete(0).unwrap();
        assert!(!index.exists(0));
        assert_eq!(index.get(1), Some(20));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.dat.idx");
        {
            let mut index = TableIndex::open(&path).unwrap();
            index.set(5, 100).unwrap();
            index.set(2, 50).unwrap();
            index.close().unwrap();
        }
        let reopened = TableIndex::open(&path).unwrap();
        assert_eq!(reopened.get(5), Some(100));
        assert_eq!(reopened.get(2), Some(50));
        assert_eq!(reopened.iter().collect::<Vec<_>>(), vec![(2, 50), (5, 100)]);
    }

    #[test]
    fn clear_empties_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.dat.idx");
        let mut index = TableIndex::open(&path).unwrap();
        index.set(0, 1).unwrap();
        index.clear().unwrap();
        assert!(index.is_empty());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn truncated_file_is_reported_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.dat.idx");
        std::fs::write(&path, [0u8; 7]).unwrap();
        assert!(matches!(TableIndex::open(&path), Err(IndexError::Corrupt(7))));
    }
}
