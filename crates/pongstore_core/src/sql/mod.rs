//! SQL statement text generation.
//!
//! # Responsibility
//! - Turn validated entity metadata into DDL and DML statement text.
//!
//! # Invariants
//! - Generation is pure; nothing in this module executes SQL.
//! - Statement shapes are a stable contract: keyword casing, clause order
//!   and `", "` separators must not drift.

pub mod ddl;
pub mod dml;
