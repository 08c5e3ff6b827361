//! CREATE TABLE / DROP TABLE generation.
//!
//! # Invariants
//! - Constraint suffix order is PRIMARY KEY, NOT NULL, UNIQUE, DEFAULT.
//! - A primary-key column never also emits NOT NULL or UNIQUE.

use crate::meta::{ColumnDecl, EntityMetadata};

/// `CREATE TABLE IF NOT EXISTS <table> (<column defs>, <fk constraints>)`
pub fn create_table(meta: &EntityMetadata) -> String {
    let mut parts: Vec<String> = meta.columns().iter().map(column_definition).collect();
    parts.extend(meta.columns().iter().filter_map(foreign_key_constraint));

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        meta.table_name(),
        parts.join(", ")
    )
}

/// `DROP TABLE IF EXISTS <table>`
pub fn drop_table(meta: &EntityMetadata) -> String {
    format!("DROP TABLE IF EXISTS {}", meta.table_name())
}

fn column_definition(column: &ColumnDecl) -> String {
    let mut definition = format!("{} {}", column.column, column.sql_type);

    if column.primary_key {
        definition.push_str(" PRIMARY KEY");
    }
    if column.not_null && !column.primary_key {
        definition.push_str(" NOT NULL");
    }
    if column.unique && !column.primary_key {
        definition.push_str(" UNIQUE");
    }
    if let Some(value) = column.default_value {
        definition.push_str(" DEFAULT ");
        definition.push_str(value);
    }

    definition
}

fn foreign_key_constraint(column: &ColumnDecl) -> Option<String> {
    column.foreign_key.map(|target| {
        format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            column.column, target.table, target.column
        )
    })
}
