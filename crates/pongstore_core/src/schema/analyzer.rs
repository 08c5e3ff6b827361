//! Foreign-key dependency analysis over entity declarations.
//!
//! # Responsibility
//! - Order declarations so referenced tables are created before the tables
//!   that reference them, and dropped in the reverse order.
//!
//! # Invariants
//! - Pure graph computation; no I/O beyond a warning on cyclic input.
//! - Deletion order is exactly the reverse of creation order.

use std::collections::{BTreeSet, HashMap, VecDeque};

use log::warn;

use crate::meta::EntityDecl;

/// Orders declarations so every foreign-key target precedes its dependents.
///
/// Kahn's algorithm over the dependents-count: each declaration's in-degree
/// is the number of *other* declarations holding at least one foreign key
/// into its table, counted once per referencing declaration. Declarations
/// nothing depends on drain first, and the emitted list is reversed so
/// callers receive creation order directly.
///
/// Cyclic input does not fail: the declarations left unvisited after the
/// queue drains are appended in input order, after a warning.
pub fn sort_for_creation(entities: &[EntityDecl]) -> Vec<&EntityDecl> {
    let index_by_table: HashMap<&str, usize> = entities
        .iter()
        .enumerate()
        .map(|(index, decl)| (decl.table, index))
        .collect();

    // Distinct referenced tables per declaration, self-references excluded.
    let targets: Vec<BTreeSet<&str>> = entities
        .iter()
        .map(|decl| {
            decl.columns
                .iter()
                .filter_map(|column| column.foreign_key)
                .map(|fk| fk.table)
                .filter(|table| *table != decl.table)
                .collect()
        })
        .collect();

    let mut in_degree = vec![0usize; entities.len()];
    for tables in &targets {
        for table in tables {
            if let Some(&index) = index_by_table.get(table) {
                in_degree[index] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..entities.len())
        .filter(|&index| in_degree[index] == 0)
        .collect();
    let mut visited = vec![false; entities.len()];
    let mut emitted = Vec::with_capacity(entities.len());

    while let Some(current) = queue.pop_front() {
        visited[current] = true;
        emitted.push(current);

        for table in &targets[current] {
            if let Some(&index) = index_by_table.get(table) {
                if !visited[index] {
                    in_degree[index] -= 1;
                    if in_degree[index] == 0 {
                        queue.push_back(index);
                    }
                }
            }
        }
    }

    // Dependents drained first; creation wants dependencies first.
    emitted.reverse();

    if emitted.len() != entities.len() {
        let remaining: Vec<&str> = (0..entities.len())
            .filter(|&index| !visited[index])
            .map(|index| entities[index].table)
            .collect();
        warn!(
            "event=dependency_cycle module=schema status=warn remaining={}",
            remaining.join(",")
        );
        for index in 0..entities.len() {
            if !visited[index] {
                emitted.push(index);
            }
        }
    }

    emitted.into_iter().map(|index| &entities[index]).collect()
}

/// Deletion order: dependents dropped strictly before their dependencies.
pub fn sort_for_deletion(entities: &[EntityDecl]) -> Vec<&EntityDecl> {
    let mut order = sort_for_creation(entities);
    order.reverse();
    order
}

#[cfg(test)]
mod tests {
    use super::{sort_for_creation, sort_for_deletion};
    use crate::meta::{ColumnDecl, EntityDecl};
    use crate::value::ValueKind;

    fn table(name: &'static str) -> EntityDecl {
        EntityDecl::new(name)
            .column(ColumnDecl::new("id", "id", "UUID", ValueKind::Uuid).primary_key())
    }

    fn reference(
        decl: EntityDecl,
        field: &'static str,
        target: &'static str,
    ) -> EntityDecl {
        decl.column(
            ColumnDecl::new(field, field, "UUID", ValueKind::Uuid)
                .not_null()
                .references(target, "id"),
        )
    }

    fn names<'a>(order: &[&'a EntityDecl]) -> Vec<&'a str> {
        order.iter().map(|decl| decl.table).collect()
    }

    fn position(order: &[&EntityDecl], name: &str) -> usize {
        order.iter().position(|decl| decl.table == name).unwrap()
    }

    #[test]
    fn match_table_is_created_last_and_dropped_first() {
        let mut match_decl = table("matches");
        for (field, target) in [
            ("left_paddle_id", "paddles"),
            ("right_paddle_id", "paddles"),
            ("ball_id", "balls"),
            ("score_manager_id", "score_manager"),
        ] {
            match_decl = reference(match_decl, field, target);
        }
        let entities = vec![match_decl, table("paddles"), table("balls"), table("score_manager")];

        let creation = sort_for_creation(&entities);
        assert_eq!(creation.len(), 4);
        assert_eq!(creation.last().unwrap().table, "matches");

        let deletion = sort_for_deletion(&entities);
        assert_eq!(deletion.first().unwrap().table, "matches");
    }

    #[test]
    fn creation_and_deletion_orders_are_mirror_images() {
        let entities = vec![
            reference(table("b"), "a_id", "a"),
            table("a"),
            reference(reference(table("c"), "a_id", "a"), "b_id", "b"),
        ];

        let creation = names(&sort_for_creation(&entities));
        let mut deletion = names(&sort_for_deletion(&entities));
        deletion.reverse();
        assert_eq!(creation, deletion);
    }

    #[test]
    fn referenced_tables_precede_their_dependents() {
        let entities = vec![
            reference(table("games"), "player_id", "players"),
            table("players"),
            reference(table("rounds"), "game_id", "games"),
        ];

        let creation = sort_for_creation(&entities);
        assert!(position(&creation, "players") < position(&creation, "games"));
        assert!(position(&creation, "games") < position(&creation, "rounds"));

        let deletion = sort_for_deletion(&entities);
        assert!(position(&deletion, "rounds") < position(&deletion, "games"));
        assert!(position(&deletion, "games") < position(&deletion, "players"));
    }

    #[test]
    fn duplicate_references_to_one_table_count_once() {
        // matches holds two paddle references; paddles must still resolve.
        let entities = vec![
            reference(
                reference(table("matches"), "left_paddle_id", "paddles"),
                "right_paddle_id",
                "paddles",
            ),
            table("paddles"),
        ];

        let creation = names(&sort_for_creation(&entities));
        assert_eq!(creation, ["paddles", "matches"]);
    }

    #[test]
    fn cycle_terminates_and_emits_every_entity_once() {
        let entities = vec![
            reference(table("chicken"), "egg_id", "egg"),
            reference(table("egg"), "chicken_id", "chicken"),
            table("feed"),
        ];

        let creation = sort_for_creation(&entities);
        assert_eq!(creation.len(), 3);
        let mut seen = names(&creation);
        seen.sort_unstable();
        assert_eq!(seen, ["chicken", "egg", "feed"]);

        let deletion = names(&sort_for_deletion(&entities));
        let mut mirrored = names(&sort_for_creation(&entities));
        mirrored.reverse();
        assert_eq!(deletion, mirrored);
    }

    #[test]
    fn self_and_unknown_references_are_ignored() {
        let entities = vec![
            reference(
                reference(table("nodes"), "parent_id", "nodes"),
                "world_id",
                "not_in_this_set",
            ),
            table("worlds"),
        ];

        let creation = sort_for_creation(&entities);
        assert_eq!(creation.len(), 2);
    }
}
