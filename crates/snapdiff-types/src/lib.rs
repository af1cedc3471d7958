//! Foundation types for snapdiff.
//!
//! Every other snapdiff crate depends on `snapdiff-types`. The types here
//! model one side of a snapshot comparison: the values a query returns, the
//! rows they form, and rows indexed by an identifying key.
//!
//! # Key Types
//!
//! - [`Value`] - Tagged column value (null, integer, real, boolean, text, blob)
//! - [`Row`] - Column-ordered mapping with a canonical text serialization
//! - [`KeyedRows`] - Insertion-ordered rows indexed by a stringified key
//! - [`Side`] - Which snapshot (left or right) something belongs to

pub mod error;
pub mod keyed;
pub mod row;
pub mod side;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use keyed::KeyedRows;
pub use row::Row;
pub use side::Side;
pub use value::Value;
