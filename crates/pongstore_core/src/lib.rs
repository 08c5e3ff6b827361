//! Declarative persistence core for Pong game state.
//!
//! Record types declare their table mapping statically; DDL and DML text is
//! generated from those declarations, tables are created and dropped in
//! foreign-key dependency order, and one generic repository provides CRUD
//! for every mapped type.

pub mod db;
pub mod logging;
pub mod meta;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;
pub mod sql;
pub mod value;

pub use db::{ConnectionFactory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use meta::{ColumnDecl, Entity, EntityDecl, EntityMetadata, ForeignKeyRef, MetaError, MetaResult};
pub use model::records::{all_declarations, BallRecord, MatchRecord, PaddleRecord, ScoreRecord};
pub use repo::{map_row, CrudRepository, MappingError, PersistenceError, RepoResult};
pub use schema::SchemaManager;
pub use service::game_state::{GameStateService, LoadedMatch, MatchSnapshot};
pub use value::{ApplyError, ApplyResult, SqlValue, ValueKind};
