//! Declaration validation and descriptor extraction.
//!
//! # Responsibility
//! - Turn a static declaration into validated entity metadata.
//! - Enforce the single-primary-key invariant before any SQL is generated.
//!
//! # Invariants
//! - Extraction is pure and recomputed per call; callers cache if they need to.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::meta::decl::{ColumnDecl, Entity, EntityDecl};

pub type MetaResult<T> = Result<T, MetaError>;

/// Configuration error in a record type's static declaration.
///
/// Always a programming mistake in the declaring type, never a runtime
/// condition worth retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    MissingTableName,
    MissingPrimaryKey {
        table: &'static str,
    },
    MultiplePrimaryKeys {
        table: &'static str,
        count: usize,
    },
    /// An `Entity::values()` impl disagreeing with its own declaration.
    ValueCountMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl Display for MetaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTableName => write!(f, "entity declaration has an empty table name"),
            Self::MissingPrimaryKey { table } => {
                write!(f, "no primary key declared for table `{table}`")
            }
            Self::MultiplePrimaryKeys { table, count } => {
                write!(f, "{count} primary keys declared for table `{table}`, expected 1")
            }
            Self::ValueCountMismatch {
                table,
                expected,
                actual,
            } => write!(
                f,
                "entity for table `{table}` produced {actual} values for {expected} declared columns"
            ),
        }
    }
}

impl Error for MetaError {}

/// Validated metadata for one mapped record type.
#[derive(Debug, Clone)]
pub struct EntityMetadata {
    table: &'static str,
    columns: Vec<ColumnDecl>,
    primary_key: usize,
}

impl EntityMetadata {
    /// Extracts and validates the metadata of a mapped record type.
    pub fn of<T: Entity>() -> MetaResult<Self> {
        Self::from_decl(T::declaration())
    }

    /// Validates an already-built declaration. Used where the concrete record
    /// type is not in scope, such as bulk schema passes.
    pub fn from_decl(decl: EntityDecl) -> MetaResult<Self> {
        if decl.table.trim().is_empty() {
            return Err(MetaError::MissingTableName);
        }

        let key_positions: Vec<usize> = decl
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.primary_key)
            .map(|(index, _)| index)
            .collect();

        match key_positions.as_slice() {
            [index] => Ok(Self {
                table: decl.table,
                columns: decl.columns,
                primary_key: *index,
            }),
            [] => Err(MetaError::MissingPrimaryKey { table: decl.table }),
            many => Err(MetaError::MultiplePrimaryKeys {
                table: decl.table,
                count: many.len(),
            }),
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &[ColumnDecl] {
        &self.columns
    }

    pub fn primary_key(&self) -> &ColumnDecl {
        &self.columns[self.primary_key]
    }

    /// Position of the primary-key column within the declared order.
    pub fn primary_key_index(&self) -> usize {
        self.primary_key
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.column)
    }

    pub fn non_key_columns(&self) -> impl Iterator<Item = &ColumnDecl> + '_ {
        self.columns.iter().filter(|column| !column.primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityMetadata, MetaError};
    use crate::meta::decl::{ColumnDecl, EntityDecl};
    use crate::value::ValueKind;

    fn keyed_column() -> ColumnDecl {
        ColumnDecl::new("id", "id", "UUID", ValueKind::Uuid).primary_key()
    }

    #[test]
    fn extraction_keeps_declared_column_order() {
        let decl = EntityDecl::new("balls")
            .column(keyed_column())
            .column(ColumnDecl::new("x", "x", "INTEGER", ValueKind::Integer))
            .column(ColumnDecl::new("y", "y", "INTEGER", ValueKind::Integer));

        let meta = EntityMetadata::from_decl(decl).unwrap();
        let names: Vec<_> = meta.column_names().collect();
        assert_eq!(names, ["id", "x", "y"]);
        assert_eq!(meta.primary_key().column, "id");
        assert_eq!(meta.primary_key_index(), 0);
    }

    #[test]
    fn empty_table_name_is_rejected() {
        let decl = EntityDecl::new("").column(keyed_column());
        assert_eq!(
            EntityMetadata::from_decl(decl).unwrap_err(),
            MetaError::MissingTableName
        );
    }

    #[test]
    fn missing_primary_key_is_rejected() {
        let decl = EntityDecl::new("balls")
            .column(ColumnDecl::new("x", "x", "INTEGER", ValueKind::Integer));
        assert_eq!(
            EntityMetadata::from_decl(decl).unwrap_err(),
            MetaError::MissingPrimaryKey { table: "balls" }
        );
    }

    #[test]
    fn second_primary_key_is_rejected() {
        let decl = EntityDecl::new("balls")
            .column(keyed_column())
            .column(ColumnDecl::new("x", "x", "INTEGER", ValueKind::Integer).primary_key());
        assert_eq!(
            EntityMetadata::from_decl(decl).unwrap_err(),
            MetaError::MultiplePrimaryKeys {
                table: "balls",
                count: 2
            }
        );
    }

    #[test]
    fn primary_key_is_found_at_any_position() {
        let decl = EntityDecl::new("scores")
            .column(ColumnDecl::new("left", "left_score", "INTEGER", ValueKind::Integer))
            .column(keyed_column());
        let meta = EntityMetadata::from_decl(decl).unwrap();
        assert_eq!(meta.primary_key_index(), 1);
    }
}
