//! Diff engine for snapdiff.
//!
//! Compares two keyed snapshots of the same table and explains how their
//! rows differ, down to individual characters of the canonical row text.
//!
//! # Key Types
//!
//! - [`DivergenceReport`] -- Missing keys on each side plus differing rows
//! - [`DifferingRow`] -- A shared key whose canonical rows differ
//! - [`EditSpan`] / [`SpanTag`] -- Character-level edit script

pub mod compare;
pub mod text_diff;

pub use compare::{compare, DifferingRow, DivergenceReport};
pub use text_diff::{diff_chars, reconstruct_new, reconstruct_old, EditScript, EditSpan, SpanTag};
