//! Database connection bootstrap.
//!
//! # Responsibility
//! - Provide the connection factory handed to repositories and the schema
//!   manager.
//! - Configure every connection before it is released to a caller.
//!
//! # Invariants
//! - Connections are opened fresh per operation and never pooled here.
//! - Returned connections have `foreign_keys=ON`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod factory;

pub use factory::ConnectionFactory;

pub type DbResult<T> = Result<T, DbError>;

/// Failure to obtain a usable connection.
#[derive(Debug)]
pub enum DbError {
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    Configure {
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open database `{}`: {source}", path.display())
            }
            Self::Configure { source } => {
                write!(f, "failed to configure connection: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Configure { source } => Some(source),
        }
    }
}
