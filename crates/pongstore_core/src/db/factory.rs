//! SQLite connection factory.
//!
//! # Responsibility
//! - Open one configured connection per data-access operation.
//! - Resolve the database location from the environment exactly once.
//!
//! # Invariants
//! - The factory holds no connection state; every `connect` call is
//!   independent and the returned handle is released by dropping it.

use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, error};
use rusqlite::Connection;

use super::{DbError, DbResult};

const DB_PATH_ENV: &str = "PONGSTORE_DB";
const DEFAULT_DB_PATH: &str = "pongstore.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Explicit connection source, constructed once at startup and passed by
/// reference to every repository and schema operation.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    path: PathBuf,
}

impl ConnectionFactory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves the database path from `PONGSTORE_DB`, falling back to the
    /// fixed local default when unset.
    pub fn from_env() -> Self {
        let path = env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh configured connection.
    ///
    /// # Side effects
    /// - Creates the database file on first use.
    /// - Emits `db_connect` logging events with duration and status.
    pub fn connect(&self) -> DbResult<Connection> {
        let started_at = Instant::now();

        let conn = match Connection::open(&self.path) {
            Ok(conn) => conn,
            Err(source) => {
                error!(
                    "event=db_connect module=db status=error path={} duration_ms={} error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    source
                );
                return Err(DbError::Open {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if let Err(source) = configure(&conn) {
            error!(
                "event=db_connect module=db status=error path={} duration_ms={} error={}",
                self.path.display(),
                started_at.elapsed().as_millis(),
                source
            );
            return Err(DbError::Configure { source });
        }

        debug!(
            "event=db_connect module=db status=ok path={} duration_ms={}",
            self.path.display(),
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    }
}

fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ConnectionFactory;

    #[test]
    fn connections_enforce_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ConnectionFactory::new(dir.path().join("pong.db"));

        let conn = factory.connect().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn each_connect_call_yields_an_independent_handle() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ConnectionFactory::new(dir.path().join("pong.db"));

        let first = factory.connect().unwrap();
        first
            .execute_batch("CREATE TABLE probe (id INTEGER PRIMARY KEY);")
            .unwrap();
        drop(first);

        let second = factory.connect().unwrap();
        let exists: i64 = second
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'probe');",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1);
    }

    #[test]
    fn open_failure_surfaces_the_offending_path() {
        let factory = ConnectionFactory::new("/nonexistent-dir/pongstore/pong.db");
        let err = factory.connect().unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/pongstore/pong.db"));
    }
}
