use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use versebase_types::{codec, Row, TableSchema};

use crate::constants::{DELIMITER_SIZE, FIELDS_DELIMITER, ROWS_DELIMITER};
use crate::error::StorageError;

/// Byte-stream reader/writer over one table's delimiter-framed record file.
///
/// The file is a pure concatenation of records: `field_0, FIELDS_DELIMITER,
/// field_1, …, field_{n-1}, ROWS_DELIMITER`. There is no header or footer.
pub struct TableFile {
    file: File,
    schema: TableSchema,
    path: PathBuf,
}

fn contains_delimiter(bytes: &[u8]) -> bool {
    bytes.len() >= DELIMITER_SIZE
        && bytes
            .windows(DELIMITER_SIZE)
            .any(|w| w == FIELDS_DELIMITER || w == ROWS_DELIMITER)
}

impl TableFile {
    /// Opens `path`, creating it empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>, schema: TableSchema) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).create(true).open(&path)?;
        log::debug!("opened table file {}", path.display());
        Ok(Self { file, schema, path })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `pos >= 0` seeks absolute from the start; `pos < 0` seeks to
    /// `pos + 1` bytes from the end (`seek(-1)` means end-of-file).
    pub fn seek(&mut self, pos: i64) -> Result<u64, StorageError> {
        let from = if pos >= 0 {
            SeekFrom::Start(pos as u64)
        } else {
            SeekFrom::End(pos + 1)
        };
        self.file.seek(from).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidInput {
                StorageError::InvalidPosition
            } else {
                StorageError::Io(e)
            }
        })
    }

    pub fn position(&mut self) -> Result<u64, StorageError> {
        Ok(self.file.stream_position()?)
    }

    pub fn at_beginning(&mut self) -> Result<bool, StorageError> {
        Ok(self.position()? == 0)
    }

    pub fn at_end(&mut self) -> Result<bool, StorageError> {
        let pos = self.position()?;
        let len = self.file.metadata()?.len();
        Ok(pos == len)
    }

    /// Reads the next record starting at the current position. Returns
    /// `None` at a clean EOF (no bytes read at all). A torn trailing record
    /// (EOF reached mid-field) is reported as [`StorageError::CorruptRecord`].
    pub fn read_row(&mut self) -> Result<Option<(Row, u64, u64)>, StorageError> {
        let begin = self.position()?;

        if begin != 0 {
            let mut preceding = [0u8; DELIMITER_SIZE];
            self.file.seek(SeekFrom::Start(begin - DELIMITER_SIZE as u64))?;
            self.file.read_exact(&mut preceding)?;
            self.file.seek(SeekFrom::Start(begin))?;
            if preceding != ROWS_DELIMITER {
                log::error!("file pointer corrupt at offset {begin} in {}", self.path.display());
                return Err(StorageError::FilePointerCorrupt(begin));
            }
        }

        let mut fields: Vec<Vec<u8>> = Vec::new();
        let mut buf: Vec<u8> = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = self.file.read(&mut byte)?;
            if n == 0 {
                if fields.is_empty() && buf.is_empty() {
                    return Ok(None);
                }
                log::error!("torn record at offset {begin} in {}: EOF mid-field", self.path.display());
                return Err(StorageError::CorruptRecord {
                    offset: begin,
                    expected: self.schema.arity(),
                    found: fields.len(),
                });
            }
            buf.push(byte[0]);
            if buf.len() >= DELIMITER_SIZE {
                let tail = &buf[buf.len() - DELIMITER_SIZE..];
                if tail == FIELDS_DELIMITER {
                    let field_len = buf.len() - DELIMITER_SIZE;
                    fields.push(buf[..field_len].to_vec());
                    buf.clear();
                } else if tail == ROWS_DELIMITER {
                    let field_len = buf.len() - DELIMITER_SIZE;
                    fields.push(buf[..field_len].to_vec());
                    buf.clear();
                    break;
                }
            }
        }

        let end = self.position()?;
        if fields.len() != self.schema.arity() {
            log::error!(
                "record at offset {begin} in {} has {} fields, schema expects {}",
                self.path.display(),
                fields.len(),
                self.schema.arity()
            );
            return Err(StorageError::CorruptRecord {
                offset: begin,
                expected: self.schema.arity(),
                found: fields.len(),
            });
        }

        let mut row = Row::new();
        for (bytes, field) in fields.into_iter().zip(self.schema.fields()) {
            let value = codec::decode(field.datatype, &bytes)?;
            row.set(field.name.clone(), value);
        }
        Ok(Some((row, begin, end)))
    }

    /// Appends `row` at end-of-file as one complete framed record, flushing
    /// after the closing delimiter. Never writes a partial record.
    pub fn write_row(&mut self, row: &Row) -> Result<(u64, u64), StorageError> {
        let begin = self.seek(-1)?;

        let mut buffer = Vec::new();
        for field in self.schema.fields() {
            let value = row
                .get(&field.name)
                .ok_or_else(|| StorageError::InvalidValue { field: field.name.clone() })?;
            let encoded = codec::encode(value)?;
            if contains_delimiter(&encoded) {
                return Err(StorageError::InvalidValue { field: field.name.clone() });
            }
            buffer.extend_from_slice(&encoded);
            buffer.extend_from_slice(&FIELDS_DELIMITER);
        }
        let without_trailing_field_delim = buffer.len() - DELIMITER_SIZE;
        buffer.truncate(without_trailing_field_delim);
        buffer.extend_from_slice(&ROWS_DELIMITER);

        self.file.write_all(&buffer)?;
        self.file.flush()?;
        let end = self.position()?;
        Ok((begin, end))
    }

    /// Removes the framed bytes in `[begin, end)`, shifting every byte after
    /// `end` left by `end - begin`. Offsets past `end` are invalidated by
    /// this call; callers must rebuild any dependent index afterward.
    pub fn erase(&mut self, begin: u64, end: u64) -> Result<(), StorageError> {
        if begin >= end {
            return Err(StorageError::InvalidRange { begin, end });
        }
        self.file.seek(SeekFrom::Start(end))?;
        let mut tail = Vec::new();
        self.file.read_to_end(&mut tail)?;
        self.file.set_len(begin)?;
        self.file.seek(SeekFrom::Start(begin))?;
        self.file.write_all(&tail)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), StorageError> {
        self.file.flush()?;
        Ok(())
    }
}
