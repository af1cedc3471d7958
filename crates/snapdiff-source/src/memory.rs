use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use snapdiff_types::{Row, Value};

use crate::error::{SourceError, SourceResult};
use crate::traits::QuerySource;

/// In-memory source answering queries from canned results.
///
/// Intended for tests and embedding. Results are keyed by the trimmed SQL
/// text; parameters are ignored. Every query issued is recorded in order so
/// callers can assert which queries ran.
pub struct InMemorySource {
    name: String,
    results: RwLock<HashMap<String, Result<Vec<Row>, String>>>,
    executed: Mutex<Vec<String>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: RwLock::new(HashMap::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Register the rows returned for `sql`.
    pub fn with_rows(self, sql: &str, rows: Vec<Row>) -> Self {
        self.set_rows(sql, rows);
        self
    }

    /// Register a failure returned for `sql`.
    pub fn with_failure(self, sql: &str, reason: impl Into<String>) -> Self {
        self.results
            .write()
            .expect("lock poisoned")
            .insert(sql.trim().to_string(), Err(reason.into()));
        self
    }

    /// Register or replace the rows returned for `sql`.
    pub fn set_rows(&self, sql: &str, rows: Vec<Row>) {
        self.results
            .write()
            .expect("lock poisoned")
            .insert(sql.trim().to_string(), Ok(rows));
    }

    /// Queries issued so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("lock poisoned").clone()
    }
}

impl QuerySource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, sql: &str, _params: &[Value]) -> SourceResult<Vec<Row>> {
        let sql = sql.trim();
        self.executed
            .lock()
            .expect("lock poisoned")
            .push(sql.to_string());

        match self.results.read().expect("lock poisoned").get(sql) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(reason)) => Err(SourceError::Failed {
                sql: sql.to_string(),
                reason: reason.clone(),
            }),
            None => Err(SourceError::UnknownQuery {
                sql: sql.to_string(),
            }),
        }
    }
}
