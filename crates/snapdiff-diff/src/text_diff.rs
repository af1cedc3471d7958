//! Character-level diff between two strings.
//!
//! Uses the `similar` crate (Myers diff algorithm) over characters and folds
//! the per-character changes into contiguous tagged spans.

use serde::Serialize;
use similar::{Algorithm, ChangeTag, TextDiff};

/// How a span relates the old string to the new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanTag {
    /// Present only in the new string.
    Added,
    /// Present only in the old string.
    Removed,
    /// Present in both.
    Unchanged,
}

/// A contiguous, non-empty substring with its tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditSpan {
    pub tag: SpanTag,
    pub text: String,
}

impl EditSpan {
    pub fn new(tag: SpanTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

/// The ordered spans turning one string into another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EditScript {
    pub spans: Vec<EditSpan>,
}

impl EditScript {
    /// Returns `true` if the script contains no added or removed spans.
    pub fn is_unchanged(&self) -> bool {
        self.spans.iter().all(|s| s.tag == SpanTag::Unchanged)
    }

    /// Number of added characters.
    pub fn additions(&self) -> usize {
        self.count_chars(SpanTag::Added)
    }

    /// Number of removed characters.
    pub fn removals(&self) -> usize {
        self.count_chars(SpanTag::Removed)
    }

    /// The old string, rebuilt from unchanged and removed spans.
    pub fn old_text(&self) -> String {
        reconstruct_old(&self.spans)
    }

    /// The new string, rebuilt from unchanged and added spans.
    pub fn new_text(&self) -> String {
        reconstruct_new(&self.spans)
    }

    fn count_chars(&self, tag: SpanTag) -> usize {
        self.spans
            .iter()
            .filter(|s| s.tag == tag)
            .map(|s| s.text.chars().count())
            .sum()
    }
}

impl IntoIterator for EditScript {
    type Item = EditSpan;
    type IntoIter = std::vec::IntoIter<EditSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.into_iter()
    }
}

/// Compute the character-level edit script from `old` to `new`.
///
/// Total over all inputs. Equal strings yield a single unchanged span, or no
/// spans when both are empty. Adjacent changes with the same tag are merged,
/// so no two neighbouring spans share a tag and no span is empty.
pub fn diff_chars(old: &str, new: &str) -> EditScript {
    if old == new {
        let spans = if old.is_empty() {
            Vec::new()
        } else {
            vec![EditSpan::new(SpanTag::Unchanged, old)]
        };
        return EditScript { spans };
    }

    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(old, new);

    let mut spans: Vec<EditSpan> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Equal => SpanTag::Unchanged,
            ChangeTag::Delete => SpanTag::Removed,
            ChangeTag::Insert => SpanTag::Added,
        };
        let value = change.value();
        if value.is_empty() {
            continue;
        }
        match spans.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(value),
            _ => spans.push(EditSpan::new(tag, value)),
        }
    }

    EditScript { spans }
}

/// Concatenate unchanged and removed spans.
pub fn reconstruct_old(spans: &[EditSpan]) -> String {
    spans
        .iter()
        .filter(|s| s.tag != SpanTag::Added)
        .map(|s| s.text.as_str())
        .collect()
}

/// Concatenate unchanged and added spans.
pub fn reconstruct_new(spans: &[EditSpan]) -> String {
    spans
        .iter()
        .filter(|s| s.tag != SpanTag::Removed)
        .map(|s| s.text.as_str())
        .collect()
}
