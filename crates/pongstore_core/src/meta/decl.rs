//! Static table and column declarations for mapped record types.
//!
//! # Responsibility
//! - Give each persisted type one declarative description of its table.
//! - Replace runtime introspection with explicit, ordered declarations.
//!
//! # Invariants
//! - Shared base-record columns are listed before a type's own columns.
//! - Declarations are plain values; nothing here touches a connection.

use crate::value::{ApplyResult, SqlValue, ValueKind};

/// The table and column a foreign-key column points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: &'static str,
    pub column: &'static str,
}

/// Declaration of one mapped column.
#[derive(Debug, Clone)]
pub struct ColumnDecl {
    /// Record field written by `Entity::apply` for this column.
    pub field: &'static str,
    pub column: &'static str,
    /// Free-form SQL type text, emitted verbatim into DDL.
    pub sql_type: &'static str,
    pub kind: ValueKind,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    pub default_value: Option<&'static str>,
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnDecl {
    pub fn new(
        field: &'static str,
        column: &'static str,
        sql_type: &'static str,
        kind: ValueKind,
    ) -> Self {
        Self {
            field,
            column,
            sql_type,
            kind,
            primary_key: false,
            not_null: false,
            unique: false,
            default_value: None,
            foreign_key: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Default value text, emitted verbatim after `DEFAULT`.
    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Declares this column a foreign key into `table(column)`.
    pub fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.foreign_key = Some(ForeignKeyRef { table, column });
        self
    }
}

/// Declaration of one mapped record type: table name plus ordered columns.
#[derive(Debug, Clone)]
pub struct EntityDecl {
    pub table: &'static str,
    pub columns: Vec<ColumnDecl>,
}

impl EntityDecl {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDecl) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a batch of columns, preserving their order. Used to splice
    /// shared base-record columns ahead of type-specific ones.
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDecl>) -> Self {
        self.columns.extend(columns);
        self
    }
}

/// Contract every persisted record type implements.
///
/// The three methods are the static counterparts of annotation scanning and
/// reflective field access: `declaration` names the table and columns,
/// `values` reads every column in declaration order, and `apply` writes one
/// mapped value back into the named field.
pub trait Entity: Default {
    fn declaration() -> EntityDecl;

    /// Current column values, in exactly the declaration's column order.
    fn values(&self) -> Vec<SqlValue>;

    /// Writes one mapped column value into the record field named `field`.
    fn apply(&mut self, field: &str, value: SqlValue) -> ApplyResult;
}
