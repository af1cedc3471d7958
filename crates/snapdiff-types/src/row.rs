//! Ordered rows and their canonical serialization.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{TypeError, TypeResult};
use crate::value::Value;

/// One database row: column name to value, in query-result order.
///
/// Column order is significant. Two rows with the same pairs in a different
/// order serialize differently and therefore compare unequal; the query that
/// produced them defines the shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `n` columns.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            columns: Vec::with_capacity(n),
        }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    /// Set a column. An existing column keeps its position and takes the
    /// new value; a new column is appended.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.columns.push((column, value));
                None
            }
        }
    }

    /// Look up a column by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// The first column, used as the key when none is configured.
    pub fn first(&self) -> Option<(&str, &Value)> {
        self.columns.first().map(|(k, v)| (k.as_str(), v))
    }

    /// The value at a column position.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.columns.get(index).map(|(k, v)| (k.as_str(), v))
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Stringified key of this row.
    ///
    /// With `Some(column)` the named column is used; with `None` the first
    /// column is.
    pub fn key(&self, column: Option<&str>) -> TypeResult<String> {
        match column {
            Some(column) => self
                .get(column)
                .map(Value::key_text)
                .ok_or_else(|| TypeError::MissingColumn {
                    column: column.to_string(),
                    available: self.column_names().collect::<Vec<_>>().join(", "),
                }),
            None => self
                .first()
                .map(|(_, v)| v.key_text())
                .ok_or(TypeError::EmptyRow),
        }
    }

    /// Canonical serialization: pretty-printed JSON, two-space indent,
    /// columns in insertion order.
    ///
    /// Semantically identical rows produce byte-identical output. Blobs are
    /// decoded to text (see [`Value::blob_text`]).
    pub fn canonical(&self) -> String {
        // String-keyed maps of scalars cannot fail to encode.
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|e| format!("(unserializable row: {e})"))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (k, v) in &self.columns {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
