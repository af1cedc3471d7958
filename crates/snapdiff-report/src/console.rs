//! Terminal rendering.

use std::io::{self, Stderr, Stdout, Write};

use colored::Colorize;
use snapdiff_diff::{DivergenceReport, EditSpan, SpanTag};

use crate::summary::RunSummary;
use crate::ReportRenderer;

const SEPARATOR: &str = "--------------------------------------------------------";

/// Human-readable renderer.
///
/// Headers, missing-key lists and full row dumps go to `out`; the
/// character-level diff of each differing row goes to `err`. With `color`
/// set, spans are green (added), red (removed) and grey (unchanged). Without
/// it, added text is wrapped in `{+...+}` and removed text in `[-...-]`.
///
/// The summary line on `out` is coloured only when
/// [`with_out_color`](Self::with_out_color) enables it, since `out` is often
/// redirected while `err` stays on the terminal.
pub struct ConsoleRenderer<O, E> {
    out: O,
    err: E,
    color: bool,
    out_color: bool,
}

impl ConsoleRenderer<Stdout, Stderr> {
    /// Render to the process's stdout and stderr.
    pub fn stdio(color: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), color)
    }
}

impl<O: Write, E: Write> ConsoleRenderer<O, E> {
    pub fn new(out: O, err: E, color: bool) -> Self {
        Self {
            out,
            err,
            color,
            out_color: false,
        }
    }

    /// Colour the summary line on `out`.
    pub fn with_out_color(mut self, color: bool) -> Self {
        self.out_color = color;
        self
    }

    /// Give back the sinks.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn write_span(&mut self, span: &EditSpan) -> io::Result<()> {
        let text = span.text.as_str();
        if self.color {
            match span.tag {
                SpanTag::Added => write!(self.err, "{}", text.green()),
                SpanTag::Removed => write!(self.err, "{}", text.red()),
                SpanTag::Unchanged => write!(self.err, "{}", text.bright_black()),
            }
        } else {
            match span.tag {
                SpanTag::Added => write!(self.err, "{{+{text}+}}"),
                SpanTag::Removed => write!(self.err, "[-{text}-]"),
                SpanTag::Unchanged => write!(self.err, "{text}"),
            }
        }
    }
}

impl<O: Write + Send, E: Write + Send> ReportRenderer for ConsoleRenderer<O, E> {
    fn render_table(&mut self, report: &DivergenceReport) -> io::Result<()> {
        let table = &report.table;

        writeln!(self.out)?;
        writeln!(self.out, "{SEPARATOR}")?;
        writeln!(self.out, "{table} - {}/{}", report.left_rows, report.right_rows)?;

        if !report.only_left.is_empty() {
            writeln!(
                self.out,
                "Missing IDs from right table {table}: {:?}",
                report.only_left
            )?;
        }
        if !report.only_right.is_empty() {
            writeln!(
                self.out,
                "Missing IDs from left table {table}: {:?}",
                report.only_right
            )?;
        }

        for row in &report.differing {
            writeln!(
                self.out,
                "Table {table} row with {}={} differs:",
                report.key_column, row.key
            )?;
            writeln!(self.out, "Left:  {}", row.left)?;
            writeln!(self.out, "Right: {}", row.right)?;
            self.out.flush()?;

            for span in &row.edit_script().spans {
                self.write_span(span)?;
            }
            writeln!(self.err)?;
            self.err.flush()?;
        }

        let count = report.divergence_count();
        let noun = plural(count, "divergence", "divergences");
        writeln!(self.out, "{table}: {count} {noun}")?;
        self.out.flush()
    }

    fn render_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{SEPARATOR}")?;
        let tables = summary.tables_compared();
        let total = summary.total_divergences();
        let line = format!(
            "Compared {tables} {}: {total} {}",
            plural(tables, "table", "tables"),
            plural(total, "divergence", "divergences"),
        );
        if !self.out_color {
            writeln!(self.out, "{line}")?;
        } else if total == 0 {
            writeln!(self.out, "{}", line.green().bold())?;
        } else {
            writeln!(self.out, "{}", line.red().bold())?;
        }
        if let Some(table) = &summary.halted_at {
            writeln!(self.out, "Stopped at first divergence in table {table}")?;
        }
        self.out.flush()
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::TableSummary;
    use snapdiff_diff::compare;
    use snapdiff_types::{KeyedRows, Row, Value};

    fn row(id: i64, title: &str) -> Row {
        Row::from_pairs([("id", Value::from(id)), ("title", Value::from(title))])
    }

    fn keyed(rows: Vec<Row>) -> KeyedRows {
        KeyedRows::from_rows(rows, Some("id")).unwrap()
    }

    fn render(report: &DivergenceReport) -> (String, String) {
        let mut renderer = ConsoleRenderer::new(Vec::new(), Vec::new(), false);
        renderer.render_table(report).unwrap();
        let (out, err) = renderer.into_inner();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn missing_ids_listed_per_side() {
        let report = compare(
            "notes",
            "id",
            &keyed(vec![row(1, "A"), row(2, "B")]),
            &keyed(vec![row(1, "A"), row(3, "C")]),
        );
        let (out, err) = render(&report);

        assert!(out.contains("notes - 2/2"));
        assert!(out.contains("Missing IDs from right table notes: [\"2\"]"));
        assert!(out.contains("Missing IDs from left table notes: [\"3\"]"));
        assert!(out.contains("notes: 2 divergences"));
        assert!(!out.contains("differs"));
        assert!(err.is_empty());
    }

    #[test]
    fn differing_row_dumped_and_highlighted() {
        let report = compare(
            "notes",
            "id",
            &keyed(vec![row(1, "Hello")]),
            &keyed(vec![row(1, "Hallo")]),
        );
        let (out, err) = render(&report);

        assert!(out.contains("Table notes row with id=1 differs:"));
        assert!(out.contains("\"title\": \"Hello\""));
        assert!(out.contains("\"title\": \"Hallo\""));
        assert!(out.contains("notes: 1 divergence\n"));
        assert!(err.contains("\"H[-e-]{+a+}llo\""));
        assert!(err.ends_with('\n'));
    }

    #[test]
    fn equal_tables_print_header_and_zero_count() {
        let side = keyed(vec![row(1, "A")]);
        let (out, err) = render(&compare("notes", "id", &side, &side));

        assert!(out.contains(SEPARATOR));
        assert!(out.contains("notes: 0 divergences"));
        assert!(!out.contains("Missing"));
        assert!(err.is_empty());
    }

    #[test]
    fn summary_reports_halt() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), Vec::new(), false);
        let summary = RunSummary {
            tables: vec![TableSummary {
                table: "notes".into(),
                left_rows: 1,
                right_rows: 2,
                divergences: 1,
            }],
            halted_at: Some("notes".into()),
        };
        renderer.render_summary(&summary).unwrap();
        let (out, _) = renderer.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Compared 1 table: 1 divergence\n"));
        assert!(out.contains("Stopped at first divergence in table notes"));
    }

    #[test]
    fn summary_pluralizes_counts() {
        let table = |name: &str, divergences| TableSummary {
            table: name.into(),
            left_rows: 1,
            right_rows: 1,
            divergences,
        };
        let mut renderer = ConsoleRenderer::new(Vec::new(), Vec::new(), false);
        renderer
            .render_summary(&RunSummary {
                tables: vec![table("notes", 0), table("tags", 0)],
                halted_at: None,
            })
            .unwrap();
        let (out, _) = renderer.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Compared 2 tables: 0 divergences\n"));
        assert!(!out.contains("Stopped"));
    }

    #[test]
    fn summary_stays_plain_when_only_err_is_coloured() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), Vec::new(), true).with_out_color(false);
        let summary = RunSummary {
            tables: vec![TableSummary {
                table: "notes".into(),
                left_rows: 1,
                right_rows: 1,
                divergences: 3,
            }],
            halted_at: None,
        };
        renderer.render_summary(&summary).unwrap();
        let (out, _) = renderer.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Compared 1 table: 3 divergences"));
        assert!(!out.contains('\u{1b}'));
    }
}
