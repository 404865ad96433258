//! Loan (borrow) model and related types

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Loan duration when none is given
pub const DEFAULT_LOAN_DAYS: u32 = 14;

const SECONDS_PER_DAY: i64 = 86_400;

/// Loan lifecycle. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

/// Create loan request
#[derive(Debug, Clone, Validate)]
pub struct NewLoan {
    #[validate(length(min = 1, message = "Loan ID must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "Book ISBN must not be empty"))]
    pub book_isbn: String,
    #[validate(length(min = 1, message = "Member ID must not be empty"))]
    pub member_id: String,
    #[validate(range(min = 1, message = "Loan duration must be at least 1 day"))]
    pub duration_days: u32,
}

/// One book lent to one member
#[derive(Debug, Clone, Serialize)]
pub struct Loan {
    id: String,
    book_isbn: String,
    member_id: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    duration_days: u32,
}

impl Loan {
    /// Open a loan starting at `start_time`
    pub fn new(request: NewLoan, start_time: DateTime<Utc>) -> AppResult<Self> {
        let request = NewLoan {
            id: request.id.trim().to_string(),
            book_isbn: request.book_isbn.trim().to_string(),
            member_id: request.member_id.trim().to_string(),
            duration_days: request.duration_days,
        };
        request.validate()?;

        Ok(Self {
            id: request.id,
            book_isbn: request.book_isbn,
            member_id: request.member_id,
            start_time,
            end_time: None,
            duration_days: request.duration_days,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn book_isbn(&self) -> &str {
        &self.book_isbn
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn status(&self) -> LoanStatus {
        if self.is_active() {
            LoanStatus::Active
        } else {
            LoanStatus::Returned
        }
    }

    /// Date the book is expected back
    pub fn due_date(&self) -> DateTime<Utc> {
        self.start_time + Duration::days(i64::from(self.duration_days))
    }

    /// Mark the loan returned at `now`. A loan can only be closed once.
    pub fn close(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if !self.is_active() {
            return Err(AppError::AlreadyClosed(self.id.clone()));
        }
        self.end_time = Some(now);
        Ok(())
    }

    /// Whole days from the start to the return, or to `now` while active.
    /// Floors, so a reference one hour before the start counts as -1.
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> i64 {
        let reference = self.end_time.unwrap_or(now);
        (reference - self.start_time).num_seconds().div_euclid(SECONDS_PER_DAY)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.elapsed_days(now) > i64::from(self.duration_days)
    }

    /// Days left before the due date; negative once overdue, 0 after return
    pub fn remaining_days(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_active() {
            return 0;
        }
        i64::from(self.duration_days) - self.elapsed_days(now)
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.status() {
            LoanStatus::Active => "Active",
            LoanStatus::Returned => "Returned",
        };
        write!(
            f,
            "Loan {}: Book {} - Member {} ({})",
            self.id, self.book_isbn, self.member_id, state
        )
    }
}
