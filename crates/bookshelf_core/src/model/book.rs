//! Book domain model.
//!
//! # Responsibility
//! - Define the plain record persisted by the book repository.
//! - Expose accessor/mutator pairs without imposing validation.
//!
//! # Invariants
//! - `id` is `None` until the repository assigns one on insert.
//! - Once assigned, an id is never reused for another book.
//! - `title` and `description` accept any value, including `None`.

use serde::{Deserialize, Serialize};

/// Store-assigned book identity.
pub type BookId = i32;

/// One stored book: identity, title and description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: Option<BookId>,
    title: Option<String>,
    description: Option<String>,
}

impl Book {
    /// Creates an unsaved book with no title and no description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `title` and returns the book, for construction chains.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets `description` and returns the book, for construction chains.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> Option<BookId> {
        self.id
    }

    /// Overrides the identity.
    ///
    /// Callers normally leave this to the repository. Setting an id that does
    /// not exist in the store makes `save` insert under a fresh id instead.
    pub fn set_id(&mut self, id: Option<BookId>) {
        self.id = id;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Returns whether this book has never been assigned an id.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
