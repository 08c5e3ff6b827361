//! Saving and loading complete match snapshots.
//!
//! # Responsibility
//! - Persist the four satellite records plus the linking match row.
//! - Reassemble a full snapshot from a stored match id.
//!
//! # Invariants
//! - Satellites are written before the match row so its foreign keys
//!   resolve under `foreign_keys=ON`.
//! - A stored reference to a missing satellite row surfaces as an error.

use uuid::Uuid;

use crate::db::ConnectionFactory;
use crate::model::records::{BallRecord, MatchRecord, PaddleRecord, ScoreRecord};
use crate::repo::{CrudRepository, PersistenceError, RepoResult};

/// In-memory snapshot of one match, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub left_paddle: PaddleRecord,
    pub right_paddle: PaddleRecord,
    pub ball: BallRecord,
    pub score: ScoreRecord,
}

/// A snapshot reloaded from storage, with the id of its linking row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedMatch {
    pub match_id: Uuid,
    pub left_paddle: PaddleRecord,
    pub right_paddle: PaddleRecord,
    pub ball: BallRecord,
    pub score: ScoreRecord,
}

/// Save/load facade over one repository per record type.
pub struct GameStateService<'f> {
    paddles: CrudRepository<'f, PaddleRecord>,
    balls: CrudRepository<'f, BallRecord>,
    scores: CrudRepository<'f, ScoreRecord>,
    matches: CrudRepository<'f, MatchRecord>,
}

impl<'f> GameStateService<'f> {
    pub fn new(factory: &'f ConnectionFactory) -> Self {
        Self {
            paddles: CrudRepository::new(factory),
            balls: CrudRepository::new(factory),
            scores: CrudRepository::new(factory),
            matches: CrudRepository::new(factory),
        }
    }

    /// Persists the snapshot and returns the new match id.
    pub fn save_match(&self, snapshot: &MatchSnapshot) -> RepoResult<Uuid> {
        self.paddles.create(&snapshot.left_paddle)?;
        self.paddles.create(&snapshot.right_paddle)?;
        self.balls.create(&snapshot.ball)?;
        self.scores.create(&snapshot.score)?;

        let link = MatchRecord::linking(
            &snapshot.left_paddle,
            &snapshot.right_paddle,
            &snapshot.ball,
            &snapshot.score,
        );
        self.matches.create(&link)?;
        Ok(link.id)
    }

    /// Loads one stored match and its satellites.
    ///
    /// An unknown match id is `Ok(None)`; a match row whose satellite rows
    /// are gone is a `DanglingReference` error.
    pub fn load_match(&self, match_id: Uuid) -> RepoResult<Option<LoadedMatch>> {
        let Some(stored) = self.matches.read(match_id)? else {
            return Ok(None);
        };

        let left_paddle = require(
            self.paddles.read(stored.left_paddle_id)?,
            "paddles",
            stored.left_paddle_id,
        )?;
        let right_paddle = require(
            self.paddles.read(stored.right_paddle_id)?,
            "paddles",
            stored.right_paddle_id,
        )?;
        let ball = require(self.balls.read(stored.ball_id)?, "balls", stored.ball_id)?;
        let score = require(
            self.scores.read(stored.score_manager_id)?,
            "score_manager",
            stored.score_manager_id,
        )?;

        Ok(Some(LoadedMatch {
            match_id: stored.id,
            left_paddle,
            right_paddle,
            ball,
            score,
        }))
    }

    /// Every stored match row, in result order.
    pub fn list_matches(&self) -> RepoResult<Vec<MatchRecord>> {
        self.matches.find_all()
    }

    /// Score satellite lookup by its own id.
    pub fn score_for_match(&self, score_manager_id: Uuid) -> RepoResult<Option<ScoreRecord>> {
        self.scores.read(score_manager_id)
    }
}

fn require<R>(found: Option<R>, table: &'static str, id: Uuid) -> RepoResult<R> {
    found.ok_or(PersistenceError::DanglingReference { table, id })
}
