//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `bookshelf_core` linkage and store bootstrap from a shell.
//! - Keep output deterministic for quick local sanity checks.
//!
//! # Environment
//! - `BOOKSHELF_DB_PATH`: database file; an in-memory store when unset.
//! - `BOOKSHELF_LOG_DIR`: absolute log directory; logging stays off when unset.
//! - `BOOKSHELF_LOG_LEVEL`: log level, defaults to the build-mode level.

use bookshelf_core::db::{open_db, open_db_in_memory};
use bookshelf_core::{
    core_version, default_log_level, init_logging, BookRepository, SqliteBookRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("bookshelf_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = env_value("BOOKSHELF_LOG_DIR") {
        let level = env_value("BOOKSHELF_LOG_LEVEL")
            .unwrap_or_else(|| default_log_level().as_str().to_string());
        init_logging(&level, log_dir)?;
    }

    let conn = match env_value("BOOKSHELF_DB_PATH") {
        Some(path) => open_db(PathBuf::from(path))?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteBookRepository::try_new(&conn)?;

    println!("bookshelf_core version={}", core_version());
    println!("bookshelf_core books={}", repo.count()?);
    Ok(())
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}
