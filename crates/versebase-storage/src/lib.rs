//! Delimiter-framed table files and the persistent primary-key index that
//! backs each table in the versebase storage engine.

mod constants;
pub mod error;
mod table_file;
mod table_index;

pub use constants::{DELIMITER_SIZE, FIELDS_DELIMITER, ROWS_DELIMITER};
pub use error::{IndexError, StorageError};
pub use table_file::TableFile;
pub use table_index::TableIndex;
