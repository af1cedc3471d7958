//! Snapshot comparison: diff two keyed row collections of one table.
//!
//! Keys are matched by exact stringified value. Rows sharing a key are
//! compared by their canonical serialization, so equality means
//! byte-identical canonical text.

use std::collections::HashSet;

use serde::Serialize;
use snapdiff_types::KeyedRows;

use crate::text_diff::{diff_chars, EditScript};

/// A key present on both sides whose canonical rows differ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DifferingRow {
    pub key: String,
    pub left: String,
    pub right: String,
}

impl DifferingRow {
    /// Character-level edit script from the left row to the right row.
    pub fn edit_script(&self) -> EditScript {
        diff_chars(&self.left, &self.right)
    }
}

/// Everything that diverges between two snapshots of one table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DivergenceReport {
    /// Table (or descriptor) name.
    pub table: String,
    /// Name of the identifying column, for display.
    pub key_column: String,
    /// Number of keyed rows on the left.
    pub left_rows: usize,
    /// Number of keyed rows on the right.
    pub right_rows: usize,
    /// Keys only on the left, in left order (missing from right).
    pub only_left: Vec<String>,
    /// Keys only on the right, in right order (missing from left).
    pub only_right: Vec<String>,
    /// Shared keys with differing content, in left order.
    pub differing: Vec<DifferingRow>,
}

impl DivergenceReport {
    /// Returns `true` if the two snapshots agree completely.
    pub fn is_empty(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty() && self.differing.is_empty()
    }

    /// Missing keys on either side plus differing rows.
    pub fn divergence_count(&self) -> usize {
        self.only_left.len() + self.only_right.len() + self.differing.len()
    }

    /// Number of shared keys whose rows are identical.
    pub fn matching_rows(&self) -> usize {
        self.left_rows - self.only_left.len() - self.differing.len()
    }
}

/// Compare two keyed snapshots of `table`.
///
/// Pure: the inputs are not modified and the same inputs always produce the
/// same report. Either side may be empty.
pub fn compare(
    table: impl Into<String>,
    key_column: impl Into<String>,
    left: &KeyedRows,
    right: &KeyedRows,
) -> DivergenceReport {
    let only_left = missing_from(left, right);
    let only_right = missing_from(right, left);

    let mut differing = Vec::new();
    for (key, left_row) in left.iter() {
        let Some(right_row) = right.get(key) else {
            continue;
        };
        let left_text = left_row.canonical();
        let right_text = right_row.canonical();
        if left_text != right_text {
            differing.push(DifferingRow {
                key: key.to_string(),
                left: left_text,
                right: right_text,
            });
        }
    }

    DivergenceReport {
        table: table.into(),
        key_column: key_column.into(),
        left_rows: left.len(),
        right_rows: right.len(),
        only_left,
        only_right,
        differing,
    }
}

/// Keys of `from` absent in `other`, in `from` order.
fn missing_from(from: &KeyedRows, other: &KeyedRows) -> Vec<String> {
    let other_keys: HashSet<&str> = other.keys().collect();
    from.keys()
        .filter(|k| !other_keys.contains(k))
        .map(str::to_string)
        .collect()
}
