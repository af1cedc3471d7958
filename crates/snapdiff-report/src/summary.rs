use serde::Serialize;
use snapdiff_diff::DivergenceReport;

/// Counts kept for one compared table after its report is discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: String,
    pub left_rows: usize,
    pub right_rows: usize,
    pub divergences: usize,
}

impl From<&DivergenceReport> for TableSummary {
    fn from(report: &DivergenceReport) -> Self {
        Self {
            table: report.table.clone(),
            left_rows: report.left_rows,
            right_rows: report.right_rows,
            divergences: report.divergence_count(),
        }
    }
}

/// Outcome of one comparison run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Tables compared, in descriptor order.
    pub tables: Vec<TableSummary>,
    /// Set when the run stopped at the first divergent table.
    pub halted_at: Option<String>,
}

impl RunSummary {
    pub fn tables_compared(&self) -> usize {
        self.tables.len()
    }

    pub fn total_divergences(&self) -> usize {
        self.tables.iter().map(|t| t.divergences).sum()
    }

    /// Returns `true` if the run stopped early on a divergence.
    pub fn is_halted(&self) -> bool {
        self.halted_at.is_some()
    }

    /// Returns `true` if no table diverged.
    pub fn is_equivalent(&self) -> bool {
        self.total_divergences() == 0
    }
}
