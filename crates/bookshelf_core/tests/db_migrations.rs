use bookshelf_core::db::migrations::{current_version, latest_version};
use bookshelf_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "books");
    assert_table_exists(&conn, "sequences");
}

#[test]
fn opening_same_database_twice_keeps_rows_and_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute_batch(
            "UPDATE sequences SET next_value = 5 WHERE name = 'book_seq';
             INSERT INTO books (id, title) VALUES (4, 'kept');",
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_version(&conn_second).unwrap(), latest_version());
    let next: i64 = conn_second
        .query_row(
            "SELECT next_value FROM sequences WHERE name = 'book_seq';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(next, 5);
    let title: String = conn_second
        .query_row("SELECT title FROM books WHERE id = 4;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(title, "kept");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
