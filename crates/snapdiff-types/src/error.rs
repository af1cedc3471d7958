use thiserror::Error;

/// Errors produced while shaping query results into snapdiff types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The designated key column is not part of the row.
    #[error("key column '{column}' not present in row (columns: {available})")]
    MissingColumn { column: String, available: String },

    /// A row without columns cannot provide a default key.
    #[error("row has no columns to derive a key from")]
    EmptyRow,
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
