//! Persistence repositories: generic CRUD over declared record types.
//!
//! # Responsibility
//! - Define the persistence error surface shared by data-access operations.
//! - Isolate SQL execution details from callers.
//!
//! # Invariants
//! - Statement failures carry the affected entity type and are never
//!   silently swallowed.

use std::error::Error;
use std::fmt::{Display, Formatter};

use uuid::Uuid;

use crate::db::DbError;
use crate::meta::MetaError;

pub mod crud;
pub mod mapper;

pub use crud::CrudRepository;
pub use mapper::{map_row, MappingError};

pub type RepoResult<T> = Result<T, PersistenceError>;

/// Failure of a single data-access operation.
#[derive(Debug)]
pub enum PersistenceError {
    /// Invalid static declaration; a programming error, never retried.
    Config(MetaError),
    /// No usable connection could be obtained.
    Connection(DbError),
    /// The statement itself failed at the database level.
    Statement {
        entity: &'static str,
        operation: &'static str,
        source: rusqlite::Error,
    },
    /// A result row could not be converted into the target record type.
    Mapping(MappingError),
    /// A stored foreign key points at a row that no longer exists.
    DanglingReference { table: &'static str, id: Uuid },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Connection(err) => write!(f, "{err}"),
            Self::Statement {
                entity,
                operation,
                source,
            } => write!(f, "{operation} failed for {entity}: {source}"),
            Self::Mapping(err) => write!(f, "{err}"),
            Self::DanglingReference { table, id } => {
                write!(f, "stored reference to missing {table} row {id}")
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Connection(err) => Some(err),
            Self::Statement { source, .. } => Some(source),
            Self::Mapping(err) => Some(err),
            Self::DanglingReference { .. } => None,
        }
    }
}

impl From<MetaError> for PersistenceError {
    fn from(value: MetaError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Connection(value)
    }
}

impl From<MappingError> for PersistenceError {
    fn from(value: MappingError) -> Self {
        Self::Mapping(value)
    }
}
