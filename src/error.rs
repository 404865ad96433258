//! Error types for the circulation desk

use serde::Serialize;
use thiserror::Error;

/// Stable numeric codes for every error condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    BadValue = 2,
    DuplicateBook = 3,
    DuplicateMember = 4,
    NoSuchBook = 5,
    NoSuchMember = 6,
    NoSuchLoan = 7,
    BookNotAvailable = 8,
    MaxLoansReached = 9,
    BookAlreadyHeld = 10,
    LoanAlreadyClosed = 11,
    BookNotHeld = 12,
    ReturnInconsistent = 13,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Book with ISBN {0} already exists in the catalog")]
    DuplicateBook(String),

    #[error("Member with ID {0} is already registered")]
    DuplicateMember(String),

    #[error("Book with ISBN {0} does not exist in the catalog")]
    BookNotFound(String),

    #[error("Member with ID {0} is not registered")]
    MemberNotFound(String),

    #[error("No active loan for book {isbn} and member {member_id}")]
    LoanNotFound { isbn: String, member_id: String },

    #[error("Book '{title}' ({isbn}) is not available")]
    BookUnavailable { isbn: String, title: String },

    #[error("Member {member_id} has reached the limit of {limit} loans")]
    LoanLimitReached { member_id: String, limit: u32 },

    #[error("Member {member_id} cannot hold more than {limit} books")]
    LimitExceeded { member_id: String, limit: u32 },

    #[error("Member {member_id} already holds book {isbn}")]
    DuplicateHold { member_id: String, isbn: String },

    #[error("Loan {0} has already been returned")]
    AlreadyClosed(String),

    #[error("Member {member_id} does not hold book {isbn}")]
    NotHeld { member_id: String, isbn: String },

    #[error("Loan {0} references a book or member that is missing")]
    ReturnInconsistent(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Numeric code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidArgument(_) => ErrorCode::BadValue,
            AppError::DuplicateBook(_) => ErrorCode::DuplicateBook,
            AppError::DuplicateMember(_) => ErrorCode::DuplicateMember,
            AppError::BookNotFound(_) => ErrorCode::NoSuchBook,
            AppError::MemberNotFound(_) => ErrorCode::NoSuchMember,
            AppError::LoanNotFound { .. } => ErrorCode::NoSuchLoan,
            AppError::BookUnavailable { .. } => ErrorCode::BookNotAvailable,
            AppError::LoanLimitReached { .. } | AppError::LimitExceeded { .. } => {
                ErrorCode::MaxLoansReached
            }
            AppError::DuplicateHold { .. } => ErrorCode::BookAlreadyHeld,
            AppError::AlreadyClosed(_) => ErrorCode::LoanAlreadyClosed,
            AppError::NotHeld { .. } => ErrorCode::BookNotHeld,
            AppError::ReturnInconsistent(_) => ErrorCode::ReturnInconsistent,
            AppError::Config(_) => ErrorCode::Failure,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidArgument(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
