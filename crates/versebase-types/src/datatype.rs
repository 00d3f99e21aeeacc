use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EncodingError;

/// The variant discriminant of a [`DataType`], persisted standalone in a
/// [`crate::Field`] (a column only ever records its *tag*, not a value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataTypeTag {
    Int,
    Bool,
    Str,
    DateTime,
}

/// A single typed value. Each variant has a fixed on-disk encoding except
/// [`DataType::Str`], whose length is implicit from the enclosing record's
/// delimiter framing (see `versebase-storage`).
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Int(i64),
    Bool(bool),
    Str(String),
    DateTime(DateTime<Utc>),
}

impl DataType {
    pub fn tag(&self) -> DataTypeTag {
        match self {
            DataType::Int(_) => DataTypeTag::Int,
            DataType::Bool(_) => DataTypeTag::Bool,
            DataType::Str(_) => DataTypeTag::Str,
            DataType::DateTime(_) => DataTypeTag::DateTime,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataType::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataType::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Encode `value` into its raw on-disk bytes. Fixed-width variants always
/// succeed except `Int`, whose logical range is wider than the 4-byte
/// two's-complement encoding.
pub fn encode(value: &DataType) -> Result<Vec<u8>, EncodingError> {
    match value {
        DataType::Int(v) => {
            let narrowed = i32::try_from(*v).map_err(|_| EncodingError::IntOutOfRange(*v))?;
            Ok(narrowed.to_be_bytes().to_vec())
        }
        DataType::Bool(v) => Ok(vec![if *v { 0x01 } else { 0x00 }]),
        DataType::Str(s) => Ok(s.as_bytes().to_vec()),
        DataType::DateTime(dt) => Ok(dt.timestamp().to_be_bytes().to_vec()),
    }
}

/// Decode `bytes` as a value of the variant named by `tag`. `bytes` must
/// already be a single field's worth of data; callers split the record
/// framing before calling this, never handing in raw tails.
pub fn decode(tag: DataTypeTag, bytes: &[u8]) -> Result<DataType, EncodingError> {
    match tag {
        DataTypeTag::Int => {
            let arr: [u8; 4] = bytes.try_into().map_err(|_| EncodingError::InvalidLength {
                tag,
                expected: 4,
                found: bytes.len(),
            })?;
            Ok(DataType::Int(i32::from_be_bytes(arr) as i64))
        }
        DataTypeTag::Bool => {
            if bytes.len() != 1 {
                return Err(EncodingError::InvalidLength {
                    tag,
                    expected: 1,
                    found: bytes.len(),
                });
            }
            Ok(DataType::Bool(bytes[0] != 0x00))
        }
        DataTypeTag::Str => {
            let s = std::str::from_utf8(bytes)?;
            Ok(DataType::Str(s.to_owned()))
        }
        DataTypeTag::DateTime => {
            let arr: [u8; 8] = bytes.try_into().map_err(|_| EncodingError::InvalidLength {
                tag,
                expected: 8,
                found: bytes.len(),
            })?;
            let secs = i64::from_be_bytes(arr);
            let dt = Utc.timestamp_opt(secs, 0).single().ok_or(EncodingError::InvalidTimestamp)?;
            Ok(DataType::DateTime(dt))
        }
    }
}
