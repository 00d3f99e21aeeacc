//! Resolves the single environment-selected data root directory the storage
//! engine persists into. Modeled on `spacetimedb-paths`/
//! `spacetimedb-core::config`'s environment-driven path resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathsError {
    #[error("environment variable `{0}` is not set")]
    NotSet(String),
    #[error("path `{0}` exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A validated, writable data root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRoot(PathBuf);

impl DataRoot {
    /// Reads `var`, creating the directory it names if it does not exist
    /// yet (mirroring `MessageLog::open`'s `fs::create_dir_all`), and
    /// failing if it exists but is not a directory.
    pub fn from_env(var: &str) -> Result<Self, PathsError> {
        let raw = env::var(var).map_err(|_| PathsError::NotSet(var.to_owned()))?;
        Self::new(raw)
    }

    pub fn new(path: impl Into<PathBuf>) -> Result<Self, PathsError> {
        let path = path.into();
        if path.exists() {
            if !path.is_dir() {
                return Err(PathsError::NotADirectory(path));
            }
        } else {
            fs::create_dir_all(&path)?;
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn from_env_missing_var_fails() {
        let var = "VERSEBASE_DATA_ROOT_DOES_NOT_EXIST_xyz";
        std::env::remove_var(var);
        assert!(matches!(DataRoot::from_env(var), Err(PathsError::NotSet(_))));
    }

    #[test]
    fn new_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested/data");
        let root = DataRoot::new(&target).unwrap();
        assert!(root.path().is_dir());
    }

    #[test]
    fn new_rejects_a_path_that_is_a_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("not_a_dir");
        std::fs::write(&file_path, b"x").unwrap();
        assert!(matches!(DataRoot::new(&file_path), Err(PathsError::NotADirectory(_))));
    }
}
