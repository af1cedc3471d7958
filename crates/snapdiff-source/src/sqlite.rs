use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags};
use snapdiff_types::{Row, Value};
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::traits::QuerySource;

/// A SQLite database file opened read-only.
///
/// The connection sits behind a `Mutex` so the source can be shared across
/// the blocking pool; queries against one source run one at a time.
pub struct SqliteSource {
    name: String,
    conn: Mutex<Connection>,
}

impl SqliteSource {
    /// Open the database at `path` read-only.
    ///
    /// Fails if the file does not exist or is not a database SQLite can open.
    pub fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SourceError::Open {
            path: PathBuf::from(path),
            source,
        })?;
        // Opening is lazy; touch the schema so a non-database file fails here
        // rather than on the first table.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
            .map_err(|source| SourceError::Open {
                path: PathBuf::from(path),
                source,
            })?;

        debug!(path = %path.display(), "opened snapshot");
        Ok(Self::from_connection(path.display().to_string(), conn))
    }

    /// Wrap an already-open connection.
    pub fn from_connection(name: impl Into<String>, conn: Connection) -> Self {
        Self {
            name: name.into(),
            conn: Mutex::new(conn),
        }
    }
}

impl QuerySource for SqliteSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, sql: &str, params: &[Value]) -> SourceResult<Vec<Row>> {
        let query_err = |source| SourceError::Query {
            sql: sql.to_string(),
            source,
        };

        let conn = self.conn.lock().expect("lock poisoned");
        let mut stmt = conn.prepare(sql).map_err(query_err)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(to_sql_value)))
            .map_err(query_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(query_err)? {
            let mut record = Row::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                let value = row.get_ref(i).map_err(query_err)?;
                record.insert(column.as_str(), from_value_ref(value));
            }
            out.push(record);
        }

        debug!(source = %self.name, rows = out.len(), "query complete");
        Ok(out)
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Boolean(b) => SqlValue::Integer(i64::from(*b)),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        // SQLite does not enforce UTF-8 in TEXT. Keep invalid bytes intact so
        // distinct values never collapse into the same replacement text.
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("snapshot.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE notes (noteId TEXT PRIMARY KEY, title TEXT, isDeleted INTEGER, score REAL);
             CREATE TABLE note_contents (noteId TEXT PRIMARY KEY, content BLOB);
             INSERT INTO notes VALUES ('root', 'Root', 0, 1.5);
             INSERT INTO notes VALUES ('n1', 'First', 0, NULL);
             INSERT INTO notes VALUES ('n2', 'Gone', 1, 0.0);
             INSERT INTO note_contents VALUES ('n1', CAST('hello' AS BLOB));",
        )
        .unwrap();
        path
    }

    #[test]
    fn reads_rows_in_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteSource::open(seeded_db(&dir)).unwrap();

        let rows = source
            .query("SELECT title, noteId, score FROM notes WHERE isDeleted = 0 ORDER BY noteId", &[])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].column_names().collect::<Vec<_>>(),
            vec!["title", "noteId", "score"]
        );
        assert_eq!(rows[0].get("noteId"), Some(&Value::from("n1")));
        assert_eq!(rows[0].get("score"), Some(&Value::Null));
        assert_eq!(rows[1].get("score"), Some(&Value::Real(1.5)));
    }

    #[test]
    fn binds_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteSource::open(seeded_db(&dir)).unwrap();

        let value = source
            .query_single_value(
                "SELECT title FROM notes WHERE noteId = ? AND isDeleted = ?",
                &[Value::from("n2"), Value::Boolean(true)],
            )
            .unwrap();
        assert_eq!(value, Some(Value::from("Gone")));
    }

    #[test]
    fn blobs_come_back_as_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteSource::open(seeded_db(&dir)).unwrap();

        let row = source
            .query_single_row("SELECT noteId, content FROM note_contents", &[])
            .unwrap()
            .unwrap();
        assert_eq!(row.get("content"), Some(&Value::Blob(b"hello".to_vec())));
        assert!(row.canonical().contains("\"content\": \"hello\""));
    }

    #[test]
    fn invalid_utf8_text_keeps_its_bytes() {
        let conn = Connection::open_in_memory().unwrap();
        let source = SqliteSource::from_connection("memory", conn);

        let row = source
            .query_single_row(
                "SELECT CAST(X'61FF' AS TEXT) AS a, CAST(X'61FE' AS TEXT) AS b, 'ok' AS c",
                &[],
            )
            .unwrap()
            .unwrap();
        assert_eq!(row.get("a"), Some(&Value::Blob(vec![0x61, 0xff])));
        assert_eq!(row.get("b"), Some(&Value::Blob(vec![0x61, 0xfe])));
        assert_eq!(row.get("c"), Some(&Value::from("ok")));

        let canonical = row.canonical();
        assert!(canonical.contains("(binary content, 2 bytes: 61ff)"));
        assert!(canonical.contains("(binary content, 2 bytes: 61fe)"));
    }

    #[test]
    fn missing_column_is_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteSource::open(seeded_db(&dir)).unwrap();

        let err = source.query("SELECT noteId, dateCreated FROM notes", &[]).unwrap_err();
        match err {
            SourceError::Query { sql, source } => {
                assert!(sql.contains("dateCreated"));
                assert!(source.to_string().contains("dateCreated"));
            }
            other => panic!("expected Query, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteSource::open(seeded_db(&dir)).unwrap();

        let result = source.query("INSERT INTO notes VALUES ('n3', 'x', 0, 0.0)", &[]);
        assert!(matches!(result, Err(SourceError::Query { .. })));
        let count = source
            .query_single_value("SELECT count(*) FROM notes", &[])
            .unwrap();
        assert_eq!(count, Some(Value::Integer(3)));
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteSource::open(dir.path().join("absent.db")).err().unwrap();
        assert!(matches!(err, SourceError::Open { .. }));
    }

    #[test]
    fn open_non_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, b"this is definitely not a sqlite database file").unwrap();
        let err = SqliteSource::open(&path).err().unwrap();
        assert!(matches!(err, SourceError::Open { .. }));
    }

    #[test]
    fn indexed_by_key_column() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteSource::open(seeded_db(&dir)).unwrap();

        let keyed = source
            .query_indexed("SELECT noteId, title FROM notes ORDER BY noteId", &[], Some("noteId"))
            .unwrap();
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["n1", "n2", "root"]);
    }
}
