//! Book (catalog entry) model and related types

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;

/// Create book request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub publication_date: Option<NaiveDate>,
}

impl NewBook {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            publication_date: None,
        }
    }

    pub fn published(mut self, date: NaiveDate) -> Self {
        self.publication_date = Some(date);
        self
    }
}

/// A catalog entry.
///
/// Equality and hashing only look at the ISBN: two books with the same ISBN
/// but a different title are the same catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    isbn: String,
    title: String,
    author: String,
    available: bool,
    publication_date: Option<NaiveDate>,
}

impl Book {
    /// Build a book from a request. Text fields are trimmed before validation,
    /// so whitespace-only values are rejected.
    pub fn new(request: NewBook) -> AppResult<Self> {
        let request = NewBook {
            isbn: request.isbn.trim().to_string(),
            title: request.title.trim().to_string(),
            author: request.author.trim().to_string(),
            publication_date: request.publication_date,
        };
        request.validate()?;

        Ok(Self {
            isbn: request.isbn,
            title: request.title,
            author: request.author,
            available: true,
            publication_date: request.publication_date,
        })
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn publication_date(&self) -> Option<NaiveDate> {
        self.publication_date
    }

    /// Mark the book as lent. Returns false if it was already out.
    pub fn lend(&mut self) -> bool {
        if !self.available {
            return false;
        }
        self.available = false;
        true
    }

    /// Mark the book as back on the shelf. Returns false if it was not out.
    pub fn return_copy(&mut self) -> bool {
        if self.available {
            return false;
        }
        self.available = true;
        true
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.isbn == other.isbn
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.isbn.hash(state);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.available { "Available" } else { "On loan" };
        write!(f, "{} by {} (ISBN: {}) - {}", self.title, self.author, self.isbn, state)
    }
}
