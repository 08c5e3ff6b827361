//! INSERT / SELECT / UPDATE / DELETE generation.
//!
//! # Invariants
//! - Placeholders are positional and follow declared column order.
//! - UPDATE lists every non-key column first and the primary key last; the
//!   repository binds parameters in that exact order.

use crate::meta::EntityMetadata;

/// `INSERT INTO <table> (<all columns>) VALUES (?, ...)`
pub fn insert(meta: &EntityMetadata) -> String {
    let columns: Vec<&str> = meta.column_names().collect();
    let placeholders = vec!["?"; columns.len()].join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        meta.table_name(),
        columns.join(", "),
        placeholders
    )
}

/// `SELECT * FROM <table> WHERE <pk> = ?`
pub fn select_by_id(meta: &EntityMetadata) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = ?",
        meta.table_name(),
        meta.primary_key().column
    )
}

/// `SELECT * FROM <table>`
pub fn select_all(meta: &EntityMetadata) -> String {
    format!("SELECT * FROM {}", meta.table_name())
}

/// `UPDATE <table> SET <non-key cols> = ? ... WHERE <pk> = ?`
pub fn update(meta: &EntityMetadata) -> String {
    let assignments: Vec<String> = meta
        .non_key_columns()
        .map(|column| format!("{} = ?", column.column))
        .collect();

    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        meta.table_name(),
        assignments.join(", "),
        meta.primary_key().column
    )
}

/// `DELETE FROM <table> WHERE <pk> = ?`
pub fn delete(meta: &EntityMetadata) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?",
        meta.table_name(),
        meta.primary_key().column
    )
}

#[cfg(test)]
mod tests {
    use super::{delete, insert, select_all, select_by_id, update};
    use crate::meta::{ColumnDecl, EntityDecl, EntityMetadata};
    use crate::value::ValueKind;

    fn integer(field: &'static str) -> ColumnDecl {
        ColumnDecl::new(field, field, "INTEGER", ValueKind::Integer).not_null()
    }

    fn ball_metadata() -> EntityMetadata {
        EntityMetadata::from_decl(
            EntityDecl::new("balls")
                .column(ColumnDecl::new("id", "id", "UUID", ValueKind::Uuid).primary_key())
                .column(integer("x"))
                .column(integer("y"))
                .column(integer("velocity_x"))
                .column(integer("velocity_y")),
        )
        .unwrap()
    }

    #[test]
    fn insert_lists_every_column_in_declared_order() {
        assert_eq!(
            insert(&ball_metadata()),
            "INSERT INTO balls (id, x, y, velocity_x, velocity_y) VALUES (?, ?, ?, ?, ?)"
        );
    }

    #[test]
    fn select_by_id_filters_on_the_primary_key() {
        assert_eq!(select_by_id(&ball_metadata()), "SELECT * FROM balls WHERE id = ?");
    }

    #[test]
    fn select_all_has_no_filter() {
        assert_eq!(select_all(&ball_metadata()), "SELECT * FROM balls");
    }

    #[test]
    fn update_binds_the_primary_key_last_for_a_narrow_entity() {
        let meta = EntityMetadata::from_decl(
            EntityDecl::new("counters")
                .column(ColumnDecl::new("id", "id", "UUID", ValueKind::Uuid).primary_key())
                .column(integer("value")),
        )
        .unwrap();

        let sql = update(&meta);
        assert_eq!(sql, "UPDATE counters SET value = ? WHERE id = ?");
        assert!(sql.rfind("id = ?").unwrap() > sql.rfind("value = ?").unwrap());
    }

    #[test]
    fn update_binds_the_primary_key_last_for_a_wide_entity() {
        let meta = EntityMetadata::from_decl(
            EntityDecl::new("wide")
                .column(ColumnDecl::new("id", "id", "UUID", ValueKind::Uuid).primary_key())
                .column(integer("a"))
                .column(integer("b"))
                .column(integer("c"))
                .column(integer("d"))
                .column(integer("e")),
        )
        .unwrap();

        let sql = update(&meta);
        assert_eq!(
            sql,
            "UPDATE wide SET a = ?, b = ?, c = ?, d = ?, e = ? WHERE id = ?"
        );
        assert_eq!(sql.matches('?').count(), 6);
        assert!(sql.ends_with("WHERE id = ?"));
    }

    #[test]
    fn update_skips_a_primary_key_declared_mid_list() {
        let meta = EntityMetadata::from_decl(
            EntityDecl::new("scores")
                .column(integer("left_score"))
                .column(ColumnDecl::new("id", "id", "UUID", ValueKind::Uuid).primary_key())
                .column(integer("right_score")),
        )
        .unwrap();

        assert_eq!(
            update(&meta),
            "UPDATE scores SET left_score = ?, right_score = ? WHERE id = ?"
        );
    }

    #[test]
    fn delete_filters_on_the_primary_key() {
        assert_eq!(delete(&ball_metadata()), "DELETE FROM balls WHERE id = ?");
    }
}
