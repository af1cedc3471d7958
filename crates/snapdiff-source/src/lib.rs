//! Query layer for snapdiff.
//!
//! A [`QuerySource`] runs SQL text against one snapshot and hands back rows
//! as ordered column/value mappings. Nothing here compares anything; the
//! diff engine only ever sees the rows.
//!
//! # Backends
//!
//! - [`SqliteSource`] -- a database file opened read-only through `rusqlite`
//! - [`InMemorySource`] -- canned results keyed by SQL text, for tests and embedding
//!
//! # Design Rules
//!
//! 1. Sources are read-only. Nothing is ever written to a snapshot.
//! 2. Rows keep the column order of the query result.
//! 3. Failures carry the SQL that failed and the driver's own error.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use error::{SourceError, SourceResult};
pub use memory::InMemorySource;
pub use sqlite::SqliteSource;
pub use traits::QuerySource;
