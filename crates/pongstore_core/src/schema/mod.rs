//! Schema lifecycle orchestration.
//!
//! # Responsibility
//! - Create and drop every mapped table in dependency-consistent order.
//! - Keep bulk passes best-effort: one bad table does not abort the rest.
//!
//! # Invariants
//! - Each statement runs on its own fresh connection.
//! - Connection failures propagate; per-table statement failures are logged
//!   and skipped.

use log::{info, warn};

use crate::db::ConnectionFactory;
use crate::meta::{EntityDecl, EntityMetadata};
use crate::repo::{PersistenceError, RepoResult};
use crate::sql::ddl;

pub mod analyzer;

/// Creates, drops, and recreates the tables of a declaration set.
pub struct SchemaManager<'f> {
    factory: &'f ConnectionFactory,
}

impl<'f> SchemaManager<'f> {
    pub fn new(factory: &'f ConnectionFactory) -> Self {
        Self { factory }
    }

    /// Creates every table, referenced tables first.
    ///
    /// Best-effort: a declaration that fails to validate or a statement the
    /// backend rejects is logged and skipped. Only a connection failure
    /// aborts the pass.
    pub fn create_all(&self, entities: &[EntityDecl]) -> RepoResult<()> {
        for decl in analyzer::sort_for_creation(entities) {
            self.apply_best_effort(decl, "create_table", |manager, decl| {
                manager.create_table(decl)
            })?;
        }
        Ok(())
    }

    /// Drops every table, dependents first.
    pub fn drop_all(&self, entities: &[EntityDecl]) -> RepoResult<()> {
        for decl in analyzer::sort_for_deletion(entities) {
            self.apply_best_effort(decl, "drop_table", |manager, decl| {
                manager.drop_table(decl)
            })?;
        }
        Ok(())
    }

    /// Drops and recreates every table.
    pub fn recreate_all(&self, entities: &[EntityDecl]) -> RepoResult<()> {
        self.drop_all(entities)?;
        self.create_all(entities)
    }

    /// Creates one table from its declaration.
    pub fn create_table(&self, decl: &EntityDecl) -> RepoResult<()> {
        let meta = EntityMetadata::from_decl(decl.clone())?;
        self.execute(meta.table_name(), "create_table", &ddl::create_table(&meta))
    }

    /// Drops one table from its declaration.
    pub fn drop_table(&self, decl: &EntityDecl) -> RepoResult<()> {
        let meta = EntityMetadata::from_decl(decl.clone())?;
        self.execute(meta.table_name(), "drop_table", &ddl::drop_table(&meta))
    }

    fn apply_best_effort(
        &self,
        decl: &EntityDecl,
        operation: &'static str,
        run: impl Fn(&Self, &EntityDecl) -> RepoResult<()>,
    ) -> RepoResult<()> {
        match run(self, decl) {
            Ok(()) => Ok(()),
            Err(err @ PersistenceError::Connection(_)) => Err(err),
            Err(err) => {
                warn!(
                    "event=schema_apply module=schema status=error operation={} table={} error={}",
                    operation, decl.table, err
                );
                Ok(())
            }
        }
    }

    fn execute(&self, table: &'static str, operation: &'static str, sql: &str) -> RepoResult<()> {
        let conn = self.factory.connect()?;
        conn.execute_batch(sql)
            .map_err(|source| PersistenceError::Statement {
                entity: table,
                operation,
                source,
            })?;
        info!(
            "event=schema_apply module=schema status=ok operation={} table={}",
            operation, table
        );
        Ok(())
    }
}
