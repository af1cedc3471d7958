//! Rows indexed by an identifying key.

use std::collections::HashMap;

use tracing::warn;

use crate::error::TypeResult;
use crate::row::Row;

/// Insertion-ordered mapping from stringified key to row.
///
/// Keys are unique. Inserting an existing key replaces the row
/// (last write wins) while the entry keeps the position of its first
/// insertion. Replacements are counted in [`KeyedRows::replaced`] so a
/// non-unique key column shows up in diagnostics instead of vanishing.
#[derive(Clone, Debug, Default)]
pub struct KeyedRows {
    entries: Vec<(String, Row)>,
    index: HashMap<String, usize>,
    replaced: usize,
}

impl KeyedRows {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key a query result.
    ///
    /// `key_column` names the identifying column; `None` uses each row's
    /// first column. Fails if a row lacks the key column.
    pub fn from_rows<I>(rows: I, key_column: Option<&str>) -> TypeResult<Self>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut keyed = Self::new();
        for row in rows {
            let key = row.key(key_column)?;
            keyed.insert(key, row);
        }
        if keyed.replaced > 0 {
            warn!(
                key_column = key_column.unwrap_or("<first column>"),
                replaced = keyed.replaced,
                "duplicate key values; later rows replaced earlier ones"
            );
        }
        Ok(keyed)
    }

    /// Insert a row under `key`. Returns the replaced row, if any.
    pub fn insert(&mut self, key: impl Into<String>, row: Row) -> Option<Row> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => {
                self.replaced += 1;
                Some(std::mem::replace(&mut self.entries[pos].1, row))
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, row));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Row> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, row)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows dropped because a later row had the same key.
    pub fn replaced(&self) -> usize {
        self.replaced
    }
}

impl FromIterator<(String, Row)> for KeyedRows {
    fn from_iter<I: IntoIterator<Item = (String, Row)>>(iter: I) -> Self {
        let mut keyed = Self::new();
        for (k, r) in iter {
            keyed.insert(k, r);
        }
        keyed
    }
}
