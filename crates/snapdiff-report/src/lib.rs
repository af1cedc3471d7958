//! Report rendering for snapdiff.
//!
//! Renderers are purely presentational: they receive finished
//! [`DivergenceReport`](snapdiff_diff::DivergenceReport)s and write them to
//! output sinks. Swapping the renderer never touches comparison logic.
//!
//! - [`ConsoleRenderer`] -- summaries and row dumps on one sink, highlighted
//!   character diffs on another (stdout / stderr for a terminal)
//! - [`JsonRenderer`] -- one JSON object per line, machine-readable

pub mod console;
pub mod json;
pub mod summary;

use std::io;

use snapdiff_diff::DivergenceReport;

pub use console::ConsoleRenderer;
pub use json::JsonRenderer;
pub use summary::{RunSummary, TableSummary};

/// Writes comparison results to some output.
pub trait ReportRenderer: Send {
    /// Render the report of one table.
    fn render_table(&mut self, report: &DivergenceReport) -> io::Result<()>;

    /// Render the end-of-run summary.
    fn render_summary(&mut self, summary: &RunSummary) -> io::Result<()>;
}
