//! Owned column values exchanged between records and result rows.
//!
//! # Responsibility
//! - Define the value vocabulary used for positional parameter binding.
//! - Provide checked conversions into typed record fields.
//!
//! # Invariants
//! - `Boolean` crosses the SQLite boundary as INTEGER 0/1.
//! - `Uuid` is bound as canonical text; 16-byte blobs are accepted on read.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::types::Value;
use uuid::Uuid;

/// Conversion rule applied when a column is read back from a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Real,
    Boolean,
    Text,
    Uuid,
    /// No conversion; the raw storage value is passed through unchanged.
    Raw,
}

/// One column value, owned, in transit between a record and a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
    Uuid(Uuid),
    Blob(Vec<u8>),
}

pub type ApplyResult = Result<(), ApplyError>;

/// Failure to move a mapped value into a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    OutOfRange {
        expected: &'static str,
    },
    UnknownField(String),
}

impl Display for ApplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch { expected, found } => {
                write!(f, "expected a {expected} value, found {found}")
            }
            Self::OutOfRange { expected } => write!(f, "value does not fit {expected}"),
            Self::UnknownField(field) => write!(f, "no mapped field named `{field}`"),
        }
    }
}

impl Error for ApplyError {}

impl SqlValue {
    /// Short storage-class name, used in conversion diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Real(_) => "REAL",
            Self::Boolean(_) => "BOOLEAN",
            Self::Text(_) => "TEXT",
            Self::Uuid(_) => "UUID",
            Self::Blob(_) => "BLOB",
        }
    }

    pub fn into_i64(self) -> Result<i64, ApplyError> {
        match self {
            Self::Integer(value) => Ok(value),
            other => Err(ApplyError::Mismatch {
                expected: "INTEGER",
                found: other.kind_name(),
            }),
        }
    }

    pub fn into_i32(self) -> Result<i32, ApplyError> {
        let wide = self.into_i64()?;
        i32::try_from(wide).map_err(|_| ApplyError::OutOfRange { expected: "i32" })
    }

    /// Integer-affinity storage is widened, matching SQLite's own behavior.
    pub fn into_f64(self) -> Result<f64, ApplyError> {
        match self {
            Self::Real(value) => Ok(value),
            Self::Integer(value) => Ok(value as f64),
            other => Err(ApplyError::Mismatch {
                expected: "REAL",
                found: other.kind_name(),
            }),
        }
    }

    /// Accepts only 0/1 from integer storage; anything else is corrupt data.
    pub fn into_bool(self) -> Result<bool, ApplyError> {
        match self {
            Self::Boolean(value) => Ok(value),
            Self::Integer(0) => Ok(false),
            Self::Integer(1) => Ok(true),
            Self::Integer(_) => Err(ApplyError::OutOfRange { expected: "BOOLEAN 0/1" }),
            other => Err(ApplyError::Mismatch {
                expected: "BOOLEAN",
                found: other.kind_name(),
            }),
        }
    }

    pub fn into_text(self) -> Result<String, ApplyError> {
        match self {
            Self::Text(value) => Ok(value),
            other => Err(ApplyError::Mismatch {
                expected: "TEXT",
                found: other.kind_name(),
            }),
        }
    }

    pub fn into_uuid(self) -> Result<Uuid, ApplyError> {
        match self {
            Self::Uuid(value) => Ok(value),
            Self::Text(value) => Uuid::parse_str(&value).map_err(|_| ApplyError::Mismatch {
                expected: "UUID",
                found: "malformed uuid text",
            }),
            other => Err(ApplyError::Mismatch {
                expected: "UUID",
                found: other.kind_name(),
            }),
        }
    }
}

impl From<SqlValue> for Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(value) => Value::Integer(value),
            SqlValue::Real(value) => Value::Real(value),
            SqlValue::Boolean(value) => Value::Integer(i64::from(value)),
            SqlValue::Text(value) => Value::Text(value),
            SqlValue::Uuid(value) => Value::Text(value.to_string()),
            SqlValue::Blob(value) => Value::Blob(value),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplyError, SqlValue};
    use rusqlite::types::Value;
    use uuid::Uuid;

    #[test]
    fn bool_accepts_only_zero_and_one_from_integer_storage() {
        assert!(!SqlValue::Integer(0).into_bool().unwrap());
        assert!(SqlValue::Integer(1).into_bool().unwrap());
        assert!(matches!(
            SqlValue::Integer(2).into_bool(),
            Err(ApplyError::OutOfRange { .. })
        ));
    }

    #[test]
    fn i32_conversion_rejects_out_of_range_values() {
        assert_eq!(SqlValue::Integer(42).into_i32().unwrap(), 42);
        let err = SqlValue::Integer(i64::MAX).into_i32().unwrap_err();
        assert!(matches!(err, ApplyError::OutOfRange { expected: "i32" }));
    }

    #[test]
    fn uuid_conversion_accepts_text_and_rejects_garbage() {
        let id = Uuid::new_v4();
        let parsed = SqlValue::Text(id.to_string()).into_uuid().unwrap();
        assert_eq!(parsed, id);

        let err = SqlValue::Text("not-a-uuid".to_string()).into_uuid().unwrap_err();
        assert!(matches!(err, ApplyError::Mismatch { expected: "UUID", .. }));
    }

    #[test]
    fn real_conversion_widens_integer_affinity_values() {
        assert_eq!(SqlValue::Integer(3).into_f64().unwrap(), 3.0);
        assert_eq!(SqlValue::Real(1.5).into_f64().unwrap(), 1.5);
    }

    #[test]
    fn binding_conversion_encodes_bool_and_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(Value::from(SqlValue::Boolean(true)), Value::Integer(1));
        assert_eq!(Value::from(SqlValue::Uuid(id)), Value::Text(id.to_string()));
    }
}
