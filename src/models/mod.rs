//! Data models for the circulation desk

pub mod book;
pub mod loan;
pub mod member;
pub mod stats;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use loan::{Loan, LoanStatus, NewLoan};
pub use member::{Member, NewMember};
pub use stats::LibraryStats;
