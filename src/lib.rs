//! Circulation desk
//!
//! In-memory model of a library's circulation desk: a catalog of books, a
//! registry of members, and the lending workflow that links them.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use models::{Book, LibraryStats, Loan, LoanStatus, Member, NewBook, NewMember};
pub use services::Library;
