use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("seek before the beginning of the file")]
    InvalidPosition,
    #[error("record framing is corrupt: expected a rows delimiter immediately before offset {0}")]
    FilePointerCorrupt(u64),
    #[error("record at offset {0} has {found} fields, schema expects {expected}")]
    CorruptRecord { offset: u64, expected: usize, found: usize },
    #[error("value for field `{field}` contains a delimiter pattern and cannot be stored")]
    InvalidValue { field: String },
    #[error("invalid erase range: begin {begin} must be < end {end}")]
    InvalidRange { begin: u64, end: u64 },
    #[error(transparent)]
    Encoding(#[from] versebase_types::EncodingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index file length {0} is not a multiple of the 12-byte entry size")]
    Corrupt(u64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
