//! Row-to-record mapping.
//!
//! # Responsibility
//! - Convert one result row into a new record instance, column by column.
//!
//! # Invariants
//! - Conversion is directed by each column's declared value kind.
//! - Malformed stored data surfaces as an error, never as a silent default.

use std::any::type_name;
use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::types::ValueRef;
use rusqlite::Row;
use uuid::Uuid;

use crate::meta::{ColumnDecl, Entity, EntityMetadata};
use crate::value::{ApplyError, SqlValue, ValueKind};

/// Failure to convert a result row into a record, identifying the entity
/// type and the offending column.
#[derive(Debug)]
pub enum MappingError {
    Read {
        entity: &'static str,
        column: &'static str,
        source: rusqlite::Error,
    },
    Convert {
        entity: &'static str,
        column: &'static str,
        expected: &'static str,
        found: String,
    },
    Apply {
        entity: &'static str,
        field: &'static str,
        source: ApplyError,
    },
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read {
                entity,
                column,
                source,
            } => write!(f, "failed to read column `{column}` for {entity}: {source}"),
            Self::Convert {
                entity,
                column,
                expected,
                found,
            } => write!(
                f,
                "column `{column}` for {entity}: expected {expected}, found {found}"
            ),
            Self::Apply {
                entity,
                field,
                source,
            } => write!(f, "field `{field}` of {entity}: {source}"),
        }
    }
}

impl Error for MappingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Convert { .. } => None,
            Self::Apply { source, .. } => Some(source),
        }
    }
}

/// Builds a new record from one result row.
///
/// Starts from `T::default()` and applies every declared column in order,
/// so the column list must exactly match the one used to generate the query.
pub fn map_row<T: Entity>(row: &Row<'_>, meta: &EntityMetadata) -> Result<T, MappingError> {
    let entity = type_name::<T>();
    let mut record = T::default();

    for column in meta.columns() {
        let raw = row.get_ref(column.column).map_err(|source| MappingError::Read {
            entity,
            column: column.column,
            source,
        })?;

        let value = convert(column, raw).map_err(|(expected, found)| MappingError::Convert {
            entity,
            column: column.column,
            expected,
            found,
        })?;

        record
            .apply(column.field, value)
            .map_err(|source| MappingError::Apply {
                entity,
                field: column.field,
                source,
            })?;
    }

    Ok(record)
}

/// Type-directed conversion of one raw storage value.
fn convert(column: &ColumnDecl, raw: ValueRef<'_>) -> Result<SqlValue, (&'static str, String)> {
    if matches!(raw, ValueRef::Null) {
        return Ok(SqlValue::Null);
    }

    match column.kind {
        ValueKind::Integer => match raw {
            ValueRef::Integer(value) => Ok(SqlValue::Integer(value)),
            other => Err(("INTEGER", describe(other))),
        },
        ValueKind::Real => match raw {
            ValueRef::Real(value) => Ok(SqlValue::Real(value)),
            // SQLite hands back integer affinity for whole numbers.
            ValueRef::Integer(value) => Ok(SqlValue::Real(value as f64)),
            other => Err(("REAL", describe(other))),
        },
        ValueKind::Boolean => match raw {
            ValueRef::Integer(0) => Ok(SqlValue::Boolean(false)),
            ValueRef::Integer(1) => Ok(SqlValue::Boolean(true)),
            other => Err(("BOOLEAN 0/1", describe(other))),
        },
        ValueKind::Text => match raw {
            ValueRef::Text(bytes) => text(bytes).map(SqlValue::Text).ok_or(("TEXT", describe(raw))),
            other => Err(("TEXT", describe(other))),
        },
        ValueKind::Uuid => match raw {
            // Native 16-byte form, or canonical text form.
            ValueRef::Blob(bytes) => Uuid::from_slice(bytes)
                .map(SqlValue::Uuid)
                .map_err(|_| ("UUID", describe(raw))),
            ValueRef::Text(bytes) => text(bytes)
                .and_then(|value| Uuid::parse_str(&value).ok())
                .map(SqlValue::Uuid)
                .ok_or(("UUID", describe(raw))),
            other => Err(("UUID", describe(other))),
        },
        ValueKind::Raw => match raw {
            ValueRef::Integer(value) => Ok(SqlValue::Integer(value)),
            ValueRef::Real(value) => Ok(SqlValue::Real(value)),
            ValueRef::Text(bytes) => text(bytes).map(SqlValue::Text).ok_or(("UTF-8 TEXT", describe(raw))),
            ValueRef::Blob(bytes) => Ok(SqlValue::Blob(bytes.to_vec())),
            ValueRef::Null => Ok(SqlValue::Null),
        },
    }
}

fn text(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_string)
}

fn describe(raw: ValueRef<'_>) -> String {
    match raw {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(value) => format!("INTEGER {value}"),
        ValueRef::Real(value) => format!("REAL {value}"),
        ValueRef::Text(bytes) => format!("TEXT `{}`", String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => format!("BLOB of {} bytes", bytes.len()),
    }
}
