//! Member (borrower) model and related types

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Number of books a member may hold when no limit is given
pub const DEFAULT_LOAN_LIMIT: u32 = 3;

/// Register member request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewMember {
    #[validate(length(min = 1, message = "Member ID must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    /// Contact address, stored as given (trimmed)
    pub email: Option<String>,
    #[validate(range(min = 1, message = "Loan limit must be at least 1"))]
    pub loan_limit: Option<u32>,
}

impl NewMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            loan_limit: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn loan_limit(mut self, limit: u32) -> Self {
        self.loan_limit = Some(limit);
        self
    }
}

/// A registered borrower and the ISBNs they currently hold.
///
/// Equality and hashing only look at the member ID.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    id: String,
    name: String,
    email: Option<String>,
    held_books: Vec<String>,
    loan_limit: u32,
}

impl Member {
    pub fn new(request: NewMember) -> AppResult<Self> {
        let request = NewMember {
            id: request.id.trim().to_string(),
            name: request.name.trim().to_string(),
            email: request
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            loan_limit: request.loan_limit,
        };
        request.validate()?;

        Ok(Self {
            id: request.id,
            name: request.name,
            email: request.email,
            held_books: Vec::new(),
            loan_limit: request.loan_limit.unwrap_or(DEFAULT_LOAN_LIMIT),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn loan_limit(&self) -> u32 {
        self.loan_limit
    }

    /// ISBNs currently held, in the order they were lent
    pub fn held_books(&self) -> &[String] {
        &self.held_books
    }

    pub fn holds(&self, isbn: &str) -> bool {
        self.held_books.iter().any(|held| held == isbn)
    }

    pub fn loan_count(&self) -> usize {
        self.held_books.len()
    }

    pub fn can_borrow(&self) -> bool {
        self.held_books.len() < self.loan_limit as usize
    }

    /// Record a newly lent book
    pub fn add_loan(&mut self, isbn: &str) -> AppResult<()> {
        if !self.can_borrow() {
            return Err(AppError::LimitExceeded {
                member_id: self.id.clone(),
                limit: self.loan_limit,
            });
        }
        if self.holds(isbn) {
            return Err(AppError::DuplicateHold {
                member_id: self.id.clone(),
                isbn: isbn.to_string(),
            });
        }

        self.held_books.push(isbn.to_string());
        Ok(())
    }

    /// Drop a returned book
    pub fn remove_loan(&mut self, isbn: &str) -> AppResult<()> {
        let position = self
            .held_books
            .iter()
            .position(|held| held == isbn)
            .ok_or_else(|| AppError::NotHeld {
                member_id: self.id.clone(),
                isbn: isbn.to_string(),
            })?;

        self.held_books.remove(position);
        Ok(())
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ID: {}) - {}/{} loans",
            self.name,
            self.id,
            self.loan_count(),
            self.loan_limit
        )
    }
}
