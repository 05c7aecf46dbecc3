//! Domain model and its storage mapping.
//!
//! # Responsibility
//! - Define the records handled by repositories.
//! - Declare how each record maps onto store tables.
//!
//! # Invariants
//! - Models carry no persistence behavior of their own.

pub mod book;
pub mod schema;
