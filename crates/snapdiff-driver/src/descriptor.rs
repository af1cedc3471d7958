use serde::{Deserialize, Serialize};

/// One table to compare: its display name, identifying column and query.
///
/// The same query runs against both snapshots, so it must be valid for both
/// schemas. When `key_column` is `None` the first result column is the key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    #[serde(default, rename = "key", skip_serializing_if = "Option::is_none")]
    pub key_column: Option<String>,
    pub query: String,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, key_column: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_column: Some(key_column.into()),
            query: query.into(),
        }
    }

    /// A descriptor keyed by the first column of its query.
    pub fn keyed_by_first_column(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_column: None,
            query: query.into(),
        }
    }
}
