use snapdiff_source::SourceError;
use snapdiff_types::Side;

/// Fatal errors that end a run.
///
/// Divergence is never an error; see [`RunSummary::halted_at`](crate::RunSummary).
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Rows for a table could not be obtained from one snapshot. The
    /// descriptor list no longer matches that snapshot's schema.
    #[error("table '{table}': query against {side} snapshot {snapshot} failed")]
    Query {
        table: String,
        side: Side,
        /// The source's [`name`](snapdiff_source::QuerySource::name).
        snapshot: String,
        #[source]
        source: SourceError,
    },

    /// The blocking query task panicked or was cancelled.
    #[error("table '{table}': {side} query task failed: {reason}")]
    Task {
        table: String,
        side: Side,
        reason: String,
    },

    /// Writing the report failed.
    #[error("failed to write report")]
    Output(#[from] std::io::Error),
}

/// Result alias for run operations.
pub type RunResult<T> = Result<T, RunError>;
