//! Descriptor lists: loading, validation and the built-in profile.
//!
//! A descriptor file is TOML with one `[[table]]` entry per table:
//!
//! ```toml
//! [[table]]
//! name = "notes"
//! key = "noteId"      # optional, defaults to the first result column
//! query = "SELECT noteId, title FROM notes"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::descriptor::TableDescriptor;

/// Errors loading or validating a descriptor list.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read descriptor file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid descriptor file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid descriptor list: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DescriptorFile {
    #[serde(default, rename = "table")]
    tables: Vec<TableDescriptor>,
}

/// Parse and validate a descriptor list from TOML text.
pub fn parse_descriptors(text: &str) -> Result<Vec<TableDescriptor>, ConfigError> {
    let file: DescriptorFile = toml::from_str(text)?;
    validate(&file.tables)?;
    Ok(file.tables)
}

/// Read, parse and validate a descriptor file.
pub fn load_descriptors(path: impl AsRef<Path>) -> Result<Vec<TableDescriptor>, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptors(&text)
}

/// Render a descriptor list as TOML, the inverse of [`parse_descriptors`].
pub fn to_toml(descriptors: &[TableDescriptor]) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&DescriptorFile {
        tables: descriptors.to_vec(),
    })
}

/// Check a descriptor list before any query runs.
///
/// Rejects an empty list, blank names, queries or key columns, and
/// duplicate table names.
pub fn validate(descriptors: &[TableDescriptor]) -> Result<(), ConfigError> {
    if descriptors.is_empty() {
        return Err(ConfigError::Invalid("no tables to compare".into()));
    }

    let mut seen = HashSet::new();
    for (i, d) in descriptors.iter().enumerate() {
        if d.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("table #{} has no name", i + 1)));
        }
        if d.query.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("table '{}' has no query", d.name)));
        }
        if d.key_column.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "table '{}' has a blank key column",
                d.name
            )));
        }
        if !seen.insert(d.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "table '{}' is listed more than once",
                d.name
            )));
        }
    }
    Ok(())
}

/// The built-in profile: the synced tables of a hierarchical note store.
pub fn default_descriptors() -> Vec<TableDescriptor> {
    vec![
        TableDescriptor::new(
            "branches",
            "branchId",
            "SELECT branchId, noteId, parentNoteId, notePosition, utcDateCreated, isDeleted, prefix FROM branches",
        ),
        TableDescriptor::new(
            "notes",
            "noteId",
            "SELECT noteId, title, dateCreated, utcDateCreated, isProtected, isDeleted FROM notes WHERE isDeleted = 0",
        ),
        TableDescriptor::new(
            "note_contents",
            "noteId",
            "SELECT note_contents.noteId, note_contents.content FROM note_contents JOIN notes USING(noteId) WHERE isDeleted = 0",
        ),
        TableDescriptor::new(
            "note_revisions",
            "noteRevisionId",
            "SELECT noteRevisionId, noteId, title, dateCreated, dateLastEdited, utcDateCreated, utcDateLastEdited, isProtected FROM note_revisions",
        ),
        TableDescriptor::new(
            "note_revision_contents",
            "noteRevisionId",
            "SELECT noteRevisionId, content FROM note_revision_contents",
        ),
        TableDescriptor::new(
            "options",
            "name",
            "SELECT name, value, utcDateCreated FROM options WHERE isSynced = 1",
        ),
        TableDescriptor::new(
            "attributes",
            "attributeId",
            "SELECT attributeId, noteId, type, name, value FROM attributes",
        ),
        TableDescriptor::new(
            "api_tokens",
            "apiTokenId",
            "SELECT apiTokenId, token, utcDateCreated, isDeleted FROM api_tokens",
        ),
        TableDescriptor::new(
            "entity_changes",
            "uniqueId",
            "SELECT entityName || '-' || entityId AS uniqueId, hash, isErased, utcDateChanged FROM entity_changes WHERE isSynced = 1",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        let descriptors = default_descriptors();
        assert_eq!(descriptors.len(), 9);
        validate(&descriptors).unwrap();
        assert_eq!(descriptors[0].name, "branches");
        assert_eq!(descriptors[8].key_column.as_deref(), Some("uniqueId"));
    }

    #[test]
    fn parse_with_and_without_key() {
        let text = r#"
            [[table]]
            name = "notes"
            key = "noteId"
            query = "SELECT noteId, title FROM notes"

            [[table]]
            name = "options"
            query = "SELECT name, value FROM options"
        "#;
        let descriptors = parse_descriptors(text).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].key_column.as_deref(), Some("noteId"));
        assert_eq!(descriptors[1].key_column, None);
        assert_eq!(descriptors[1].query, "SELECT name, value FROM options");
    }

    #[test]
    fn toml_round_trip_of_default_profile() {
        let text = to_toml(&default_descriptors()).unwrap();
        assert_eq!(parse_descriptors(&text).unwrap(), default_descriptors());
    }

    #[test]
    fn empty_list_rejected() {
        let err = parse_descriptors("").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("no tables")));
    }

    #[test]
    fn duplicate_names_rejected() {
        let descriptors = vec![
            TableDescriptor::new("notes", "noteId", "SELECT noteId FROM notes"),
            TableDescriptor::new("notes", "noteId", "SELECT noteId FROM notes"),
        ];
        let err = validate(&descriptors).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn blank_fields_rejected() {
        assert!(validate(&[TableDescriptor::new(" ", "id", "SELECT 1")]).is_err());
        assert!(validate(&[TableDescriptor::new("t", "id", "  ")]).is_err());
        assert!(validate(&[TableDescriptor::new("t", "", "SELECT 1")]).is_err());
    }

    #[test]
    fn missing_query_field_is_parse_error() {
        let err = parse_descriptors("[[table]]\nname = \"notes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.toml");
        std::fs::write(
            &path,
            "[[table]]\nname = \"notes\"\nquery = \"SELECT noteId FROM notes\"\n",
        )
        .unwrap();
        let descriptors = load_descriptors(&path).unwrap();
        assert_eq!(descriptors[0].name, "notes");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_descriptors(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
