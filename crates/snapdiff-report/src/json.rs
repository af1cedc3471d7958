//! Machine-readable rendering: one JSON object per line.

use std::io::{self, Stdout, Write};

use serde::Serialize;
use snapdiff_diff::{DivergenceReport, EditSpan};

use crate::summary::RunSummary;
use crate::ReportRenderer;

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Line<'a> {
    Table {
        table: &'a str,
        key_column: &'a str,
        left_rows: usize,
        right_rows: usize,
        only_left: &'a [String],
        only_right: &'a [String],
        differing: Vec<DifferingLine<'a>>,
    },
    Summary {
        tables: usize,
        total_divergences: usize,
        halted_at: Option<&'a str>,
    },
}

#[derive(Serialize)]
struct DifferingLine<'a> {
    key: &'a str,
    left: &'a str,
    right: &'a str,
    spans: Vec<EditSpan>,
}

/// Writes each table report, then the summary, as a JSON object on its own
/// line.
pub struct JsonRenderer<O> {
    out: O,
}

impl JsonRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<O: Write> JsonRenderer<O> {
    pub fn new(out: O) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> O {
        self.out
    }

    fn write_line(&mut self, line: &Line<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<O: Write + Send> ReportRenderer for JsonRenderer<O> {
    fn render_table(&mut self, report: &DivergenceReport) -> io::Result<()> {
        let differing = report
            .differing
            .iter()
            .map(|row| DifferingLine {
                key: &row.key,
                left: &row.left,
                right: &row.right,
                spans: row.edit_script().spans,
            })
            .collect();

        self.write_line(&Line::Table {
            table: &report.table,
            key_column: &report.key_column,
            left_rows: report.left_rows,
            right_rows: report.right_rows,
            only_left: &report.only_left,
            only_right: &report.only_right,
            differing,
        })
    }

    fn render_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.write_line(&Line::Summary {
            tables: summary.tables_compared(),
            total_divergences: summary.total_divergences(),
            halted_at: summary.halted_at.as_deref(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as Json;
    use snapdiff_diff::compare;
    use snapdiff_types::{KeyedRows, Row, Value};

    fn keyed(rows: Vec<Row>) -> KeyedRows {
        KeyedRows::from_rows(rows, Some("id")).unwrap()
    }

    #[test]
    fn table_line_carries_report_and_spans() {
        let left = keyed(vec![
            Row::from_pairs([("id", Value::from(1)), ("title", Value::from("Hello"))]),
            Row::from_pairs([("id", Value::from(2)), ("title", Value::from("B"))]),
        ]);
        let right = keyed(vec![Row::from_pairs([
            ("id", Value::from(1)),
            ("title", Value::from("Hallo")),
        ])]);

        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render_table(&compare("notes", "id", &left, &right)).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert_eq!(text.lines().count(), 1);
        let line: Json = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(line["kind"], "table");
        assert_eq!(line["table"], "notes");
        assert_eq!(line["left_rows"], 2);
        assert_eq!(line["only_left"], serde_json::json!(["2"]));
        assert_eq!(line["differing"][0]["key"], "1");

        let spans = line["differing"][0]["spans"].as_array().unwrap();
        assert!(spans
            .iter()
            .any(|s| s["tag"] == "removed" && s["text"] == "e"));
        assert!(spans.iter().any(|s| s["tag"] == "added" && s["text"] == "a"));
    }

    #[test]
    fn summary_line() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer
            .render_summary(&RunSummary {
                tables: Vec::new(),
                halted_at: Some("notes".into()),
            })
            .unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let line: Json = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(line["kind"], "summary");
        assert_eq!(line["tables"], 0);
        assert_eq!(line["halted_at"], "notes");
    }
}
