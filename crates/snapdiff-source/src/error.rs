use std::path::PathBuf;

use snapdiff_types::TypeError;

/// Errors from query sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The snapshot could not be opened.
    #[error("cannot open database {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The database rejected or failed to run a query.
    #[error("query failed: {sql}")]
    Query {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A non-SQLite backend failed to run a query.
    #[error("query failed: {sql}: {reason}")]
    Failed { sql: String, reason: String },

    /// An in-memory source has no result registered for this SQL.
    #[error("no result registered for query: {sql}")]
    UnknownQuery { sql: String },

    /// A column requested by name is not part of the result.
    #[error("column '{column}' not present in query result")]
    MissingColumn { column: String },

    /// Rows could not be keyed.
    #[error(transparent)]
    Key(#[from] TypeError),
}

/// Result alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
