//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the book data access contract.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Lookups of absent rows return `None` rather than an error.
//! - Repository APIs surface store failures unchanged; nothing is retried.

pub mod book_repo;
