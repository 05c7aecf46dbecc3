//! SQLite store bootstrap, schema migrations and identity sequences.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the book store.
//! - Apply schema migrations in deterministic order.
//! - Allocate store-side identities through named sequences.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Repositories must not read/write rows before migrations succeed.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod sequence;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Named sequence row is absent from `sequences`.
    MissingSequence(&'static str),
    /// Sequence advanced past the range of the identity type.
    SequenceExhausted(&'static str),
}

/// Coarse failure classes surfaced to repository callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Store could not be opened, reached or locked in time.
    Unreachable,
    /// Write rejected by a constraint or column limit.
    ConstraintViolation,
    Other,
}

impl DbError {
    /// Classifies this error for callers that branch on failure class.
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::Sqlite(err) => classify_sqlite(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::MissingSequence(_)
            | Self::SequenceExhausted(_) => StoreErrorKind::Other,
        }
    }
}

fn classify_sqlite(err: &rusqlite::Error) -> StoreErrorKind {
    match err.sqlite_error_code() {
        Some(
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::SystemIoFailure
            | ErrorCode::PermissionDenied
            | ErrorCode::FileLockingProtocolFailed,
        ) => StoreErrorKind::Unreachable,
        Some(ErrorCode::ConstraintViolation | ErrorCode::TooBig) => {
            StoreErrorKind::ConstraintViolation
        }
        _ => StoreErrorKind::Other,
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingSequence(name) => write!(f, "sequence `{name}` is not registered"),
            Self::SequenceExhausted(name) => write!(f, "sequence `{name}` is exhausted"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::MissingSequence(_) => None,
            Self::SequenceExhausted(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
