//! Generic CRUD repository over one declared record type.
//!
//! # Responsibility
//! - Execute single-statement create/read/update/delete/find-all calls.
//! - Bind parameters positionally in declared column order.
//!
//! # Invariants
//! - Every operation opens one connection, runs exactly one statement, and
//!   releases the connection on every exit path.
//! - UPDATE binds non-key columns first and the primary key last.
//! - Metadata is recomputed per call; no state survives between operations.

use std::any::type_name;
use std::marker::PhantomData;

use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::db::ConnectionFactory;
use crate::meta::{Entity, EntityMetadata, MetaError};
use crate::repo::mapper::map_row;
use crate::repo::{PersistenceError, RepoResult};
use crate::sql::dml;
use crate::value::SqlValue;

/// Repository for any record type implementing [`Entity`].
///
/// Holds only the connection factory; operations are independent,
/// non-transactional, and never retried.
pub struct CrudRepository<'f, T: Entity> {
    factory: &'f ConnectionFactory,
    _record: PhantomData<fn() -> T>,
}

impl<'f, T: Entity> CrudRepository<'f, T> {
    pub fn new(factory: &'f ConnectionFactory) -> Self {
        Self {
            factory,
            _record: PhantomData,
        }
    }

    /// Inserts one record, binding every column value in declared order.
    pub fn create(&self, record: &T) -> RepoResult<()> {
        let meta = EntityMetadata::of::<T>()?;
        let values = ordered_values(record, &meta)?;
        let sql = dml::insert(&meta);

        let conn = self.factory.connect()?;
        conn.execute(&sql, params_from_iter(values.into_iter().map(Value::from)))
            .map_err(|source| statement_error::<T>("insert", source))?;
        Ok(())
    }

    /// Looks one record up by primary key; an absent row is `Ok(None)`.
    pub fn read(&self, id: impl Into<SqlValue>) -> RepoResult<Option<T>> {
        let meta = EntityMetadata::of::<T>()?;
        let sql = dml::select_by_id(&meta);

        let conn = self.factory.connect()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|source| statement_error::<T>("select", source))?;
        let mut rows = stmt
            .query([Value::from(id.into())])
            .map_err(|source| statement_error::<T>("select", source))?;

        match rows
            .next()
            .map_err(|source| statement_error::<T>("select", source))?
        {
            Some(row) => Ok(Some(map_row::<T>(row, &meta)?)),
            None => Ok(None),
        }
    }

    /// Rewrites every non-key column of the record's row.
    ///
    /// The primary-key value moves from its declared position to the end of
    /// the bind list, matching the generated WHERE clause. The row count is
    /// not inspected; writing an absent row is not an error here.
    pub fn update(&self, record: &T) -> RepoResult<()> {
        let meta = EntityMetadata::of::<T>()?;
        let mut values = ordered_values(record, &meta)?;
        let key = values.remove(meta.primary_key_index());
        values.push(key);
        let sql = dml::update(&meta);

        let conn = self.factory.connect()?;
        conn.execute(&sql, params_from_iter(values.into_iter().map(Value::from)))
            .map_err(|source| statement_error::<T>("update", source))?;
        Ok(())
    }

    /// Deletes by primary key. Deleting an absent row is not an error.
    pub fn delete(&self, id: impl Into<SqlValue>) -> RepoResult<()> {
        let meta = EntityMetadata::of::<T>()?;
        let sql = dml::delete(&meta);

        let conn = self.factory.connect()?;
        conn.execute(&sql, [Value::from(id.into())])
            .map_err(|source| statement_error::<T>("delete", source))?;
        Ok(())
    }

    /// Loads every row, in whatever order the backend returns them.
    pub fn find_all(&self) -> RepoResult<Vec<T>> {
        let meta = EntityMetadata::of::<T>()?;
        let sql = dml::select_all(&meta);

        let conn = self.factory.connect()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|source| statement_error::<T>("select", source))?;
        let mut rows = stmt
            .query([])
            .map_err(|source| statement_error::<T>("select", source))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|source| statement_error::<T>("select", source))?
        {
            records.push(map_row::<T>(row, &meta)?);
        }
        Ok(records)
    }
}

fn ordered_values<T: Entity>(record: &T, meta: &EntityMetadata) -> RepoResult<Vec<SqlValue>> {
    let values = record.values();
    if values.len() != meta.columns().len() {
        return Err(MetaError::ValueCountMismatch {
            table: meta.table_name(),
            expected: meta.columns().len(),
            actual: values.len(),
        }
        .into());
    }
    Ok(values)
}

fn statement_error<T>(operation: &'static str, source: rusqlite::Error) -> PersistenceError {
    PersistenceError::Statement {
        entity: type_name::<T>(),
        operation,
        source,
    }
}
