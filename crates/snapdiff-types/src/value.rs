//! Column values as returned by the query layer.

use std::fmt;

use serde::{Serialize, Serializer};

/// A single column value.
///
/// Mirrors the storage classes a relational driver hands back. Each variant
/// is serialized explicitly; nothing relies on implicit stringification.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
    /// Raw bytes. Canonicalized to text before comparison, see [`Value::blob_text`].
    Blob(Vec<u8>),
}

impl Value {
    /// Text form of a blob.
    ///
    /// Valid UTF-8 decodes as-is, so byte-identical content compares equal
    /// whether a driver reported it as text or as bytes. Anything else
    /// degrades to a hex placeholder; decoding never fails.
    pub fn blob_text(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => format!(
                "(binary content, {} bytes: {})",
                bytes.len(),
                hex::encode(bytes)
            ),
        }
    }

    /// Stringify the value for use as a collection key.
    pub fn key_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Real(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Text(s) => s.clone(),
            Self::Blob(bytes) => Self::blob_text(bytes),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_text())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Integer(i) => serializer.serialize_i64(*i),
            // serde_json writes non-finite floats as `null`.
            Self::Real(f) => serializer.serialize_f64(*f),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Blob(bytes) => serializer.serialize_str(&Self::blob_text(bytes)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_text_per_variant() {
        assert_eq!(Value::Null.key_text(), "null");
        assert_eq!(Value::Integer(42).key_text(), "42");
        assert_eq!(Value::Real(1.5).key_text(), "1.5");
        assert_eq!(Value::Boolean(true).key_text(), "true");
        assert_eq!(Value::from("abc").key_text(), "abc");
        assert_eq!(Value::Blob(b"xyz".to_vec()).key_text(), "xyz");
    }

    #[test]
    fn utf8_blob_matches_text() {
        let blob = Value::Blob("héllo".as_bytes().to_vec());
        let text = Value::from("héllo");
        assert_eq!(
            serde_json::to_string(&blob).unwrap(),
            serde_json::to_string(&text).unwrap()
        );
    }

    #[test]
    fn invalid_utf8_blob_degrades() {
        let text = Value::blob_text(&[0xFF, 0x00, 0xFE]);
        assert_eq!(text, "(binary content, 3 bytes: ff00fe)");
    }

    #[test]
    fn serialize_scalars() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Integer(-7)).unwrap(), "-7");
        assert_eq!(serde_json::to_string(&Value::Real(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&Value::Boolean(false)).unwrap(), "false");
        assert_eq!(serde_json::to_string(&Value::from("a\"b")).unwrap(), "\"a\\\"b\"");
    }

    #[test]
    fn non_finite_real_serializes_as_null() {
        assert_eq!(serde_json::to_string(&Value::Real(f64::NAN)).unwrap(), "null");
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
