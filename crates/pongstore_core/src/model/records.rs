//! Table declarations for saved game objects.
//!
//! # Responsibility
//! - Declare the table mapping of every record the game persists.
//! - Keep shared identity/position columns in one place.
//!
//! # Invariants
//! - Shared base columns are declared before type-specific ones, so every
//!   on-field table starts with `id, x, y`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::meta::{ColumnDecl, Entity, EntityDecl};
use crate::value::{ApplyError, ApplyResult, SqlValue, ValueKind};

/// `id UUID PRIMARY KEY`, shared by every persisted record.
fn identity_column() -> ColumnDecl {
    ColumnDecl::new("id", "id", "UUID", ValueKind::Uuid).primary_key()
}

/// `x`/`y` position columns shared by objects placed on the field.
fn position_columns() -> [ColumnDecl; 2] {
    [
        ColumnDecl::new("x", "x", "INTEGER", ValueKind::Integer).not_null(),
        ColumnDecl::new("y", "y", "INTEGER", ValueKind::Integer).not_null(),
    ]
}

fn integer_column(field: &'static str) -> ColumnDecl {
    ColumnDecl::new(field, field, "INTEGER", ValueKind::Integer).not_null()
}

fn reference_column(field: &'static str, target: &'static str) -> ColumnDecl {
    ColumnDecl::new(field, field, "UUID", ValueKind::Uuid)
        .not_null()
        .references(target, "id")
}

/// Every mapped declaration, in registration order.
///
/// The canonical set the CLI and the game-state service operate on; the
/// schema manager accepts any slice, so callers may bring their own.
pub fn all_declarations() -> Vec<EntityDecl> {
    vec![
        PaddleRecord::declaration(),
        BallRecord::declaration(),
        ScoreRecord::declaration(),
        MatchRecord::declaration(),
    ]
}

/// Saved paddle state, including its key bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddleRecord {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
    pub up_key: i32,
    pub down_key: i32,
}

impl PaddleRecord {
    pub fn new(x: i32, y: i32, up_key: i32, down_key: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            up_key,
            down_key,
        }
    }
}

impl Entity for PaddleRecord {
    fn declaration() -> EntityDecl {
        EntityDecl::new("paddles")
            .column(identity_column())
            .columns(position_columns())
            .column(integer_column("up_key"))
            .column(integer_column("down_key"))
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.x.into(),
            self.y.into(),
            self.up_key.into(),
            self.down_key.into(),
        ]
    }

    fn apply(&mut self, field: &str, value: SqlValue) -> ApplyResult {
        match field {
            "id" => self.id = value.into_uuid()?,
            "x" => self.x = value.into_i32()?,
            "y" => self.y = value.into_i32()?,
            "up_key" => self.up_key = value.into_i32()?,
            "down_key" => self.down_key = value.into_i32()?,
            other => return Err(ApplyError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Saved ball state: position plus velocity components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallRecord {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
    pub velocity_x: i32,
    pub velocity_y: i32,
}

impl BallRecord {
    pub fn new(x: i32, y: i32, velocity_x: i32, velocity_y: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            velocity_x,
            velocity_y,
        }
    }
}

impl Entity for BallRecord {
    fn declaration() -> EntityDecl {
        EntityDecl::new("balls")
            .column(identity_column())
            .columns(position_columns())
            .column(integer_column("velocity_x"))
            .column(integer_column("velocity_y"))
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.x.into(),
            self.y.into(),
            self.velocity_x.into(),
            self.velocity_y.into(),
        ]
    }

    fn apply(&mut self, field: &str, value: SqlValue) -> ApplyResult {
        match field {
            "id" => self.id = value.into_uuid()?,
            "x" => self.x = value.into_i32()?,
            "y" => self.y = value.into_i32()?,
            "velocity_x" => self.velocity_x = value.into_i32()?,
            "velocity_y" => self.velocity_y = value.into_i32()?,
            other => return Err(ApplyError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Saved score state for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: Uuid,
    pub left_score: i32,
    pub right_score: i32,
    pub winning_score: i32,
}

impl ScoreRecord {
    pub fn new(left_score: i32, right_score: i32, winning_score: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            left_score,
            right_score,
            winning_score,
        }
    }
}

impl Entity for ScoreRecord {
    fn declaration() -> EntityDecl {
        EntityDecl::new("score_manager")
            .column(identity_column())
            .column(ColumnDecl::new(
                "left_score",
                "left_score",
                "INTEGER",
                ValueKind::Integer,
            ))
            .column(ColumnDecl::new(
                "right_score",
                "right_score",
                "INTEGER",
                ValueKind::Integer,
            ))
            .column(ColumnDecl::new(
                "winning_score",
                "winning_score",
                "INTEGER",
                ValueKind::Integer,
            ))
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.left_score.into(),
            self.right_score.into(),
            self.winning_score.into(),
        ]
    }

    fn apply(&mut self, field: &str, value: SqlValue) -> ApplyResult {
        match field {
            "id" => self.id = value.into_uuid()?,
            "left_score" => self.left_score = value.into_i32()?,
            "right_score" => self.right_score = value.into_i32()?,
            "winning_score" => self.winning_score = value.into_i32()?,
            other => return Err(ApplyError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Linking row tying one saved match to its satellite records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub left_paddle_id: Uuid,
    pub right_paddle_id: Uuid,
    pub ball_id: Uuid,
    pub score_manager_id: Uuid,
}

impl MatchRecord {
    pub fn new(
        left_paddle_id: Uuid,
        right_paddle_id: Uuid,
        ball_id: Uuid,
        score_manager_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            left_paddle_id,
            right_paddle_id,
            ball_id,
            score_manager_id,
        }
    }

    /// Links already-built satellite records by their ids.
    pub fn linking(
        left_paddle: &PaddleRecord,
        right_paddle: &PaddleRecord,
        ball: &BallRecord,
        score: &ScoreRecord,
    ) -> Self {
        Self::new(left_paddle.id, right_paddle.id, ball.id, score.id)
    }
}

impl Entity for MatchRecord {
    fn declaration() -> EntityDecl {
        EntityDecl::new("matches")
            .column(identity_column())
            .column(reference_column("left_paddle_id", "paddles"))
            .column(reference_column("right_paddle_id", "paddles"))
            .column(reference_column("ball_id", "balls"))
            .column(reference_column("score_manager_id", "score_manager"))
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.left_paddle_id.into(),
            self.right_paddle_id.into(),
            self.ball_id.into(),
            self.score_manager_id.into(),
        ]
    }

    fn apply(&mut self, field: &str, value: SqlValue) -> ApplyResult {
        match field {
            "id" => self.id = value.into_uuid()?,
            "left_paddle_id" => self.left_paddle_id = value.into_uuid()?,
            "right_paddle_id" => self.right_paddle_id = value.into_uuid()?,
            "ball_id" => self.ball_id = value.into_uuid()?,
            "score_manager_id" => self.score_manager_id = value.into_uuid()?,
            other => return Err(ApplyError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}
