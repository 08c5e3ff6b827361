//! Entity metadata: static declarations and validated descriptors.
//!
//! # Responsibility
//! - Define the declaration surface every persisted record type implements.
//! - Validate declarations into metadata the SQL generators consume.
//!
//! # Invariants
//! - Declared column order is positional-binding order and row-mapping order.
//! - A validated descriptor has exactly one primary-key column.

pub mod decl;
pub mod extract;

pub use decl::{ColumnDecl, Entity, EntityDecl, ForeignKeyRef};
pub use extract::{EntityMetadata, MetaError, MetaResult};
