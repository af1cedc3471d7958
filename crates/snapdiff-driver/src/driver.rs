use std::sync::Arc;

use snapdiff_diff::{compare, DivergenceReport};
use snapdiff_report::{ReportRenderer, RunSummary, TableSummary};
use snapdiff_source::QuerySource;
use snapdiff_types::{KeyedRows, Side};
use tracing::{debug, info};

use crate::descriptor::TableDescriptor;
use crate::error::{RunError, RunResult};

/// Options for one comparison run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after the first table that diverges instead of scanning all.
    pub stop_on_first_difference: bool,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Compares two snapshots table by table.
///
/// Tables run strictly in descriptor order. Within a table the left and
/// right queries run concurrently on the blocking pool and both must finish
/// before the comparison starts. Any query failure ends the run.
pub struct Driver {
    left: Arc<dyn QuerySource>,
    right: Arc<dyn QuerySource>,
    options: RunOptions,
}

impl Driver {
    pub fn new(
        left: Arc<dyn QuerySource>,
        right: Arc<dyn QuerySource>,
        options: RunOptions,
    ) -> Self {
        Self {
            left,
            right,
            options,
        }
    }

    /// Run every descriptor, rendering each report as soon as it is ready.
    ///
    /// Divergence never fails the run. With
    /// [`RunOptions::stop_on_first_difference`] the run ends after the first
    /// non-empty report and the summary's `halted_at` names that table. The
    /// summary is rendered last in both cases. On error, reports already
    /// rendered stand and no summary is written.
    pub async fn run<R>(&self, descriptors: &[TableDescriptor], renderer: &mut R) -> RunResult<RunSummary>
    where
        R: ReportRenderer + ?Sized,
    {
        let mut summary = RunSummary::default();

        for descriptor in descriptors {
            let report = self.compare_table(descriptor).await?;
            renderer.render_table(&report)?;
            summary.tables.push(TableSummary::from(&report));

            if self.options.stop_on_first_difference && !report.is_empty() {
                info!(table = %report.table, "stopping at first divergence");
                summary.halted_at = Some(report.table.clone());
                break;
            }
        }

        renderer.render_summary(&summary)?;
        Ok(summary)
    }

    /// Query both snapshots for one table and compare them.
    pub async fn compare_table(&self, descriptor: &TableDescriptor) -> RunResult<DivergenceReport> {
        debug!(table = %descriptor.name, "querying both snapshots");
        let (left, right) = tokio::try_join!(
            fetch(Arc::clone(&self.left), Side::Left, descriptor.clone()),
            fetch(Arc::clone(&self.right), Side::Right, descriptor.clone()),
        )?;

        let key_column = key_label(descriptor, &left, &right);
        let report = compare(&descriptor.name, key_column, &left, &right);
        info!(
            table = %report.table,
            left_rows = report.left_rows,
            right_rows = report.right_rows,
            divergences = report.divergence_count(),
            "table compared"
        );
        Ok(report)
    }
}

async fn fetch(
    source: Arc<dyn QuerySource>,
    side: Side,
    descriptor: TableDescriptor,
) -> RunResult<KeyedRows> {
    let table = descriptor.name.clone();
    let snapshot = source.name().to_string();
    let task = tokio::task::spawn_blocking(move || {
        source.query_indexed(&descriptor.query, &[], descriptor.key_column.as_deref())
    });

    match task.await {
        Ok(Ok(rows)) => Ok(rows),
        Ok(Err(source)) => Err(RunError::Query {
            table,
            side,
            snapshot,
            source,
        }),
        Err(e) => Err(RunError::Task {
            table,
            side,
            reason: e.to_string(),
        }),
    }
}

/// The key column name shown in reports: the configured one, else the first
/// column of whichever side has rows.
fn key_label(descriptor: &TableDescriptor, left: &KeyedRows, right: &KeyedRows) -> String {
    if let Some(column) = &descriptor.key_column {
        return column.clone();
    }
    left.iter()
        .chain(right.iter())
        .find_map(|(_, row)| row.first().map(|(name, _)| name.to_string()))
        .unwrap_or_else(|| "key".to_string())
}
