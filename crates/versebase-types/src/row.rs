use indexmap::IndexMap;

use crate::DataType;

/// A value of a schema: an ordered mapping from field name to [`DataType`]
/// value. Two rows are equal iff they carry the same values for the same
/// field names, regardless of insertion order (the owning schema already
/// fixes that order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: IndexMap<String, DataType>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: DataType) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: DataType) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&DataType> {
        self.values.get(name)
    }

    /// The row's `id` field, if set and of the correct variant.
    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(DataType::as_int)
    }

    pub fn set_id(&mut self, id: i64) {
        self.set("id", DataType::Int(id));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataType)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, DataType)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, DataType)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
