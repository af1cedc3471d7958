use snapdiff_types::{KeyedRows, Row, Value};

use crate::error::{SourceError, SourceResult};

/// A read-only snapshot that can answer SQL queries.
///
/// Implementations must satisfy:
/// - Rows expose columns in query-result order.
/// - Every row of one result has the same columns.
/// - Queries never modify the snapshot.
/// - Failures are returned, never swallowed or retried.
pub trait QuerySource: Send + Sync {
    /// Human-readable label (usually the database path), for diagnostics.
    fn name(&self) -> &str;

    /// Run `sql` with positional `params` and return every row.
    fn query(&self, sql: &str, params: &[Value]) -> SourceResult<Vec<Row>>;

    /// Run a query and key the rows.
    ///
    /// `key_column` names the identifying column; `None` uses the first
    /// column. Duplicate keys keep the last row.
    fn query_indexed(
        &self,
        sql: &str,
        params: &[Value],
        key_column: Option<&str>,
    ) -> SourceResult<KeyedRows> {
        let rows = self.query(sql, params)?;
        Ok(KeyedRows::from_rows(rows, key_column)?)
    }

    /// Run a two-column query and map the first column to the second.
    ///
    /// The result is returned as a [`Row`] whose column names are the
    /// stringified first-column values, in result order. Later duplicates
    /// overwrite earlier ones. Rows with fewer than two columns map to null.
    fn query_map(&self, sql: &str, params: &[Value]) -> SourceResult<Row> {
        let mut map = Row::new();
        for row in self.query(sql, params)? {
            let Some((_, key)) = row.first() else {
                continue;
            };
            let value = row
                .get_index(1)
                .map_or(Value::Null, |(_, v)| v.clone());
            map.insert(key.key_text(), value);
        }
        Ok(map)
    }

    /// Run a query and collect one named column from every row.
    fn query_column(&self, sql: &str, params: &[Value], column: &str) -> SourceResult<Vec<Value>> {
        self.query(sql, params)?
            .into_iter()
            .map(|row| {
                row.get(column)
                    .cloned()
                    .ok_or_else(|| SourceError::MissingColumn {
                        column: column.to_string(),
                    })
            })
            .collect()
    }

    /// The first row of a query, if any.
    fn query_single_row(&self, sql: &str, params: &[Value]) -> SourceResult<Option<Row>> {
        Ok(self.query(sql, params)?.into_iter().next())
    }

    /// The first column of the first row of a query, if any.
    fn query_single_value(&self, sql: &str, params: &[Value]) -> SourceResult<Option<Value>> {
        Ok(self
            .query_single_row(sql, params)?
            .and_then(|row| row.first().map(|(_, v)| v.clone())))
    }
}
