//! Book persistence core.
//! Holds the `Book` model, its table mapping and the SQLite-backed repository.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{DbError, DbResult, StoreErrorKind};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::book::{Book, BookId};
pub use model::schema::{ColumnDef, ColumnType, TableDef, BOOK_TABLE};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
