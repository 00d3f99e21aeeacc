//! versebase is a small embedded single-node relational store: typed rows
//! persisted into per-table append-style binary files, a sorted
//! primary-key index per table on disk, CRUD operations, and a query
//! executor driven by an externally-parsed AST.
//!
//! This crate is a facade over the engine's component crates:
//! [`versebase_types`] (the value/schema/row types), [`versebase_storage`]
//! (the on-disk table file and index), [`versebase_table`] (the per-table
//! CRUD coordinator), [`versebase_catalog`] (the table catalog), and
//! [`versebase_query`] (the AST and executor). See `DESIGN.md` for how
//! each piece is grounded.

pub use versebase_catalog::{CatalogError, Database, Metadata, TableMeta};
pub use versebase_paths::{DataRoot, PathsError};
pub use versebase_query::{execute, Command, ExecResult, Literal, QueryError};
pub use versebase_storage::{IndexError, StorageError, TableFile, TableIndex};
pub use versebase_table::{Table, TableError};
pub use versebase_types::{codec, DataType, DataTypeTag, EncodingError, Field, Row, SchemaError, TableSchema};
