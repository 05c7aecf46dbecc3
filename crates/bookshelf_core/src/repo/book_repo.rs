//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/find/list/delete/count over the `books` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - New ids always come from the `book_seq` sequence, never from callers.
//! - Sequence allocation and insert commit or roll back together.
//! - Missing rows are reported as `None` or ignored, never as errors.

use crate::db::migrations::latest_version;
use crate::db::{sequence, DbError, StoreErrorKind};
use crate::model::book::{Book, BookId};
use crate::model::schema::{TableDef, BOOK_TABLE};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from book repository construction and operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite, bootstrap or sequence error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Stored rows or column types do not match the `Book` mapping.
    InvalidData(String),
}

impl RepoError {
    /// Classifies this error; only store errors map to a specific class.
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::Db(err) => err.kind(),
            _ => StoreErrorKind::Other,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "book repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "book repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "book repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book persistence.
pub trait BookRepository {
    /// Inserts a new book or updates the stored row with the same id.
    ///
    /// Returns the persisted state, carrying the assigned id.
    fn save(&self, book: &Book) -> RepoResult<Book>;
    /// Loads one book by id; `None` when no such row exists.
    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Loads every stored book.
    fn find_all(&self) -> RepoResult<Vec<Book>>;
    /// Removes the row with `id`; absent rows are a no-op.
    fn delete_by_id(&self, id: BookId) -> RepoResult<()>;
    /// Returns the number of stored books.
    fn count(&self) -> RepoResult<u64>;
}

/// Statements derived once from the table mapping.
struct BookSql {
    insert: String,
    update: String,
    select_by_id: String,
    select_all: String,
    delete_by_id: String,
    count: String,
}

impl BookSql {
    fn for_table(table: &TableDef) -> RepoResult<Self> {
        let key = table
            .primary_key()
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "table `{}` declares no primary key",
                    table.table
                ))
            })?
            .column;
        let name = table.table;
        let columns = table.column_list();
        let placeholders = (1..=table.columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = table
            .value_columns()
            .enumerate()
            .map(|(index, column)| format!("{} = ?{}", column.column, index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let key_param = table.value_columns().count() + 1;

        Ok(Self {
            insert: format!("INSERT INTO {name} ({columns}) VALUES ({placeholders});"),
            update: format!("UPDATE {name} SET {assignments} WHERE {key} = ?{key_param};"),
            select_by_id: format!("SELECT {columns} FROM {name} WHERE {key} = ?1;"),
            select_all: format!("SELECT {columns} FROM {name} ORDER BY {key} ASC;"),
            delete_by_id: format!("DELETE FROM {name} WHERE {key} = ?1;"),
            count: format!("SELECT COUNT(*) FROM {name};"),
        })
    }
}

/// SQLite-backed book repository bound to one connection.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
    sql: BookSql,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the store
    ///   does not match the book mapping.
    /// - `InvalidData` when a mapped column has the wrong type or nullability.
    /// - `Db(MissingSequence)` when the id sequence is not registered.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_book_connection_ready(conn, &BOOK_TABLE)?;

        Ok(Self {
            conn,
            sql: BookSql::for_table(&BOOK_TABLE)?,
        })
    }

    fn insert_new(&self, tx: &Transaction<'_>, book: &Book) -> RepoResult<Book> {
        let allocated = sequence::next_value(tx, BOOK_TABLE.sequence)?;
        let id = BookId::try_from(allocated)
            .map_err(|_| DbError::SequenceExhausted(BOOK_TABLE.sequence))?;

        tx.execute(
            &self.sql.insert,
            params![id, book.title(), book.description()],
        )?;

        let mut saved = book.clone();
        saved.set_id(Some(id));
        Ok(saved)
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn save(&self, book: &Book) -> RepoResult<Book> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if let Some(id) = book.id() {
            let changed = tx.execute(
                &self.sql.update,
                params![book.title(), book.description(), id],
            )?;
            if changed > 0 {
                tx.commit()?;
                debug!("event=book_save module=repo status=ok mode=update book_id={id}");
                return Ok(book.clone());
            }
        }

        let saved = self.insert_new(&tx, book)?;
        tx.commit()?;
        // A detached book whose row is gone is re-inserted under a new id.
        let mode = if book.is_new() { "insert" } else { "reinsert" };
        debug!(
            "event=book_save module=repo status=ok mode={mode} book_id={}",
            saved.id().unwrap_or_default()
        );
        Ok(saved)
    }

    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self.conn.prepare(&self.sql.select_by_id)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(&self.sql.select_all)?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn delete_by_id(&self, id: BookId) -> RepoResult<()> {
        let removed = self.conn.execute(&self.sql.delete_by_id, [id])?;
        debug!("event=book_delete module=repo status=ok book_id={id} removed={removed}");
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(&self.sql.count, [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative book count `{count}`")))
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let raw_id: i64 = row.get("id")?;
    let id = BookId::try_from(raw_id)
        .map_err(|_| RepoError::InvalidData(format!("id `{raw_id}` out of range in books.id")))?;

    let mut book = Book::new();
    book.set_id(Some(id));
    book.set_title(row.get("title")?);
    book.set_description(row.get("description")?);
    Ok(book)
}

fn ensure_book_connection_ready(conn: &Connection, table: &TableDef) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table.table)? {
        return Err(RepoError::MissingRequiredTable(table.table));
    }

    for column in table.columns {
        let Some(declared) = declared_column(conn, table.table, column.column)? else {
            return Err(RepoError::MissingRequiredColumn {
                table: table.table,
                column: column.column,
            });
        };
        let expected = column.column_type.sql_name();
        if !declared.sql_type.eq_ignore_ascii_case(expected) {
            return Err(RepoError::InvalidData(format!(
                "column `{}.{}` for field `{}` has type `{}`, expected `{expected}`",
                table.table, column.column, column.field, declared.sql_type
            )));
        }
        // Rowid aliases never hold NULL whatever their declaration says.
        if !column.primary_key && declared.not_null == column.nullable {
            return Err(RepoError::InvalidData(format!(
                "column `{}.{}` for field `{}` must {}allow NULL",
                table.table,
                column.column,
                column.field,
                if column.nullable { "" } else { "not " }
            )));
        }
    }

    if !table_exists(conn, "sequences")? {
        return Err(RepoError::MissingRequiredTable("sequences"));
    }
    sequence::peek_value(conn, table.sequence)?;

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Column shape as reported by `PRAGMA table_info`.
struct DeclaredColumn {
    sql_type: String,
    not_null: bool,
}

fn declared_column(
    conn: &Connection,
    table: &str,
    column: &str,
) -> RepoResult<Option<DeclaredColumn>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(Some(DeclaredColumn {
                sql_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
            }));
        }
    }
    Ok(None)
}
