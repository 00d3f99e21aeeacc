use thiserror::Error;

/// Failures raised by the [`crate::codec`] when a value cannot cross the
/// byte boundary in either direction.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("int value {0} does not fit in a signed 32-bit field")]
    IntOutOfRange(i64),
    #[error("expected {expected} bytes for a {tag:?} field, found {found}")]
    InvalidLength {
        tag: crate::DataTypeTag,
        expected: usize,
        found: usize,
    },
    #[error("field bytes are not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("field bytes do not encode a valid timestamp")]
    InvalidTimestamp,
}

/// Failures raised while constructing or validating a [`crate::TableSchema`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("a table schema must declare at least one field")]
    Empty,
    #[error("a table schema must declare exactly one `id` field of type Int")]
    MissingId,
    #[error("field `id` must have datatype Int, found {0:?}")]
    WrongIdType(crate::DataTypeTag),
    #[error("duplicate field name `{0}`")]
    DuplicateField(String),
}
