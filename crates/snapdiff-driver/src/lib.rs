//! Run driver for snapdiff.
//!
//! A run walks an ordered list of [`TableDescriptor`]s. For each one it
//! queries both snapshots, keys the rows, compares them and hands the report
//! to a renderer before moving to the next table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use snapdiff_driver::{config, Driver, RunOptions};
//! use snapdiff_report::ConsoleRenderer;
//! use snapdiff_source::SqliteSource;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let left = Arc::new(SqliteSource::open("before.db")?);
//! let right = Arc::new(SqliteSource::open("after.db")?);
//! let driver = Driver::new(left, right, RunOptions::default());
//! let mut renderer = ConsoleRenderer::stdio(false);
//! let summary = driver.run(&config::default_descriptors(), &mut renderer).await?;
//! println!("{} divergences", summary.total_divergences());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod descriptor;
pub mod driver;
pub mod error;

pub use config::ConfigError;
pub use descriptor::TableDescriptor;
pub use driver::{Driver, RunOptions};
pub use error::{RunError, RunResult};
pub use snapdiff_report::{RunSummary, TableSummary};
