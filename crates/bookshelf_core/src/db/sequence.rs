//! Store-side identity sequences.
//!
//! # Responsibility
//! - Hand out the next unused value of a named sequence.
//!
//! # Invariants
//! - Values start at the seeded initial value and grow by exactly one.
//! - Allocation size is one; nothing is cached in process.
//! - Callers allocate inside the same write transaction as the insert that
//!   consumes the value, so a rolled back insert also releases the value.

use super::{DbError, DbResult};
use rusqlite::{Connection, OptionalExtension};

/// Allocates the next value of sequence `name`.
///
/// # Errors
/// - `DbError::MissingSequence` when `name` was never registered.
/// - `DbError::Sqlite` on store failures.
pub fn next_value(conn: &Connection, name: &'static str) -> DbResult<i64> {
    let allocated: Option<i64> = conn
        .query_row(
            "UPDATE sequences
             SET next_value = next_value + 1
             WHERE name = ?1
             RETURNING next_value - 1;",
            [name],
            |row| row.get(0),
        )
        .optional()?;

    allocated.ok_or(DbError::MissingSequence(name))
}

/// Returns the value the next allocation of `name` will yield.
pub fn peek_value(conn: &Connection, name: &'static str) -> DbResult<i64> {
    conn.query_row(
        "SELECT next_value FROM sequences WHERE name = ?1;",
        [name],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(DbError::MissingSequence(name))
}
