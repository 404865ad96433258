//! Circulation service: catalog, members and the lending workflow
//!
//! `Library` is the only writer of books and members once they are registered.
//! Every mutating operation validates first and mutates last, so a failed call
//! leaves no partial state behind.

use std::fmt;
use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    config::LibraryConfig,
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, NewLoan, DEFAULT_LOAN_DAYS},
        member::Member,
        stats::LibraryStats,
    },
    repository::Repository,
};

/// Prefix of generated loan IDs
pub const LOAN_ID_PREFIX: &str = "LOAN";

/// Format a loan sequence number, e.g. 1 -> `LOAN-00001`
pub fn format_loan_id(sequence: u32) -> String {
    format!("{}-{:05}", LOAN_ID_PREFIX, sequence)
}

pub struct Library {
    name: String,
    repository: Repository,
    /// Last sequence number handed out; the first loan gets 1
    loan_counter: u32,
    default_loan_days: u32,
    clock: Arc<dyn Clock>,
}

impl Library {
    /// Create an empty library on wall-clock time
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Arc::new(SystemClock))
    }

    /// Create an empty library reading time from `clock`
    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            repository: Repository::new(),
            loan_counter: 0,
            default_loan_days: DEFAULT_LOAN_DAYS,
            clock,
        }
    }

    /// Create an empty library from configuration
    pub fn from_config(config: &LibraryConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        if config.default_loan_days < 1 {
            return Err(AppError::InvalidArgument(
                "Default loan duration must be at least 1 day".to_string(),
            ));
        }

        let mut library = Self::with_clock(config.name.clone(), clock);
        library.default_loan_days = config.default_loan_days;
        Ok(library)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_loan_days(&self) -> u32 {
        self.default_loan_days
    }

    // ==================== Catalog ====================

    /// Add a book to the catalog
    pub fn add_book(&mut self, book: Book) -> AppResult<()> {
        if self.repository.books.contains(book.isbn()) {
            tracing::warn!("Catalog: rejected duplicate ISBN {}", book.isbn());
            return Err(AppError::DuplicateBook(book.isbn().to_string()));
        }

        tracing::info!("Catalog: added '{}' (ISBN {})", book.title(), book.isbn());
        self.repository.books.insert(book);
        Ok(())
    }

    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        tracing::debug!("Catalog lookup: {}", isbn);
        self.repository.books.get(isbn)
    }

    /// Books whose title contains `title`, ignoring case. An empty query matches every book.
    pub fn search_books_by_title(&self, title: &str) -> Vec<&Book> {
        self.repository.books.search_by(title, Book::title)
    }

    /// Books whose author contains `author`, ignoring case. An empty query matches every book.
    pub fn search_books_by_author(&self, author: &str) -> Vec<&Book> {
        self.repository.books.search_by(author, Book::author)
    }

    pub fn available_books(&self) -> Vec<&Book> {
        self.repository.books.iter().filter(|b| b.is_available()).collect()
    }

    pub fn total_books(&self) -> usize {
        self.repository.books.len()
    }

    // ==================== Members ====================

    /// Register a new member
    pub fn register_member(&mut self, member: Member) -> AppResult<()> {
        if self.repository.members.contains(member.id()) {
            tracing::warn!("Members: rejected duplicate ID {}", member.id());
            return Err(AppError::DuplicateMember(member.id().to_string()));
        }

        tracing::info!("Members: registered {} ({})", member.name(), member.id());
        self.repository.members.insert(member);
        Ok(())
    }

    pub fn find_member(&self, id: &str) -> Option<&Member> {
        tracing::debug!("Member lookup: {}", id);
        self.repository.members.get(id)
    }

    pub fn total_members(&self) -> usize {
        self.repository.members.len()
    }

    // ==================== Loans ====================

    /// Lend a book for the default loan duration
    pub fn lend_book(&mut self, isbn: &str, member_id: &str) -> AppResult<Loan> {
        self.lend_book_for(isbn, member_id, self.default_loan_days)
    }

    /// Lend a book to a member for `duration_days` days
    pub fn lend_book_for(
        &mut self,
        isbn: &str,
        member_id: &str,
        duration_days: u32,
    ) -> AppResult<Loan> {
        // Validate book
        let book = self.repository.books.get(isbn).ok_or_else(|| {
            tracing::warn!("Lend rejected: unknown ISBN {}", isbn);
            AppError::BookNotFound(isbn.to_string())
        })?;
        if !book.is_available() {
            tracing::warn!("Lend rejected: {} is already on loan", isbn);
            return Err(AppError::BookUnavailable {
                isbn: isbn.to_string(),
                title: book.title().to_string(),
            });
        }

        // Validate member
        let member = self.repository.members.get(member_id).ok_or_else(|| {
            tracing::warn!("Lend rejected: unknown member {}", member_id);
            AppError::MemberNotFound(member_id.to_string())
        })?;
        if !member.can_borrow() {
            tracing::warn!(
                "Lend rejected: member {} is at the limit of {} loans",
                member_id,
                member.loan_limit()
            );
            return Err(AppError::LoanLimitReached {
                member_id: member_id.to_string(),
                limit: member.loan_limit(),
            });
        }
        // An available book can't already be held; guard the invariant anyway
        if member.holds(isbn) {
            return Err(AppError::DuplicateHold {
                member_id: member_id.to_string(),
                isbn: isbn.to_string(),
            });
        }

        let sequence = self.loan_counter + 1;
        let loan = Loan::new(
            NewLoan {
                id: format_loan_id(sequence),
                book_isbn: isbn.to_string(),
                member_id: member_id.to_string(),
                duration_days,
            },
            self.clock.now(),
        )?;

        // All checks passed: apply the four updates together
        let book = self
            .repository
            .books
            .get_mut(isbn)
            .ok_or_else(|| AppError::BookNotFound(isbn.to_string()))?;
        let member = self
            .repository
            .members
            .get_mut(member_id)
            .ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))?;
        member.add_loan(isbn)?;
        book.lend();
        self.loan_counter = sequence;
        self.repository.loans.insert(loan.clone());

        tracing::info!(
            "Loan {}: {} lent to {} for {} days",
            loan.id(),
            isbn,
            member_id,
            duration_days
        );
        Ok(loan)
    }

    /// Take back a book lent to a member. Returns the closed loan.
    pub fn return_book(&mut self, isbn: &str, member_id: &str) -> AppResult<Loan> {
        let loan_id = self
            .repository
            .loans
            .find_active(isbn, member_id)
            .map(|loan| loan.id().to_string())
            .ok_or_else(|| {
                tracing::warn!("Return rejected: no active loan of {} to {}", isbn, member_id);
                AppError::LoanNotFound {
                    isbn: isbn.to_string(),
                    member_id: member_id.to_string(),
                }
            })?;

        let book_out = self
            .repository
            .books
            .get(isbn)
            .is_some_and(|book| !book.is_available());
        let member_holds = self
            .repository
            .members
            .get(member_id)
            .is_some_and(|member| member.holds(isbn));
        if !book_out || !member_holds {
            tracing::error!("Return of loan {}: book or member record out of sync", loan_id);
            return Err(AppError::ReturnInconsistent(loan_id));
        }

        let now = self.clock.now();
        let (Some(loan), Some(book), Some(member)) = (
            self.repository.loans.get_mut(&loan_id),
            self.repository.books.get_mut(isbn),
            self.repository.members.get_mut(member_id),
        ) else {
            return Err(AppError::ReturnInconsistent(loan_id));
        };
        loan.close(now)?;
        book.return_copy();
        member.remove_loan(isbn)?;

        tracing::info!("Loan {}: {} returned by {}", loan_id, isbn, member_id);
        Ok(loan.clone())
    }

    pub fn find_loan(&self, id: &str) -> Option<&Loan> {
        self.repository.loans.get(id)
    }

    pub fn active_loans(&self) -> Vec<&Loan> {
        self.repository.loans.active().collect()
    }

    /// Active loans past their duration as of the clock's current time
    pub fn overdue_loans(&self) -> Vec<&Loan> {
        self.repository.loans.overdue(self.clock.now()).collect()
    }

    /// Every loan of a member, returned or not
    pub fn loans_for_member(&self, member_id: &str) -> Vec<&Loan> {
        self.repository.loans.for_member(member_id)
    }

    pub fn total_loans(&self) -> usize {
        self.repository.loans.len()
    }

    // ==================== Statistics ====================

    pub fn stats(&self) -> LibraryStats {
        let total_books = self.total_books();
        let available_books = self.repository.books.count_available();

        LibraryStats {
            total_books,
            available_books,
            loaned_books: total_books - available_books,
            total_members: self.total_members(),
            total_loans: self.total_loans(),
            active_loans: self.repository.loans.active().count(),
            overdue_loans: self.repository.loans.overdue(self.clock.now()).count(),
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} books, {} members",
            self.name,
            self.total_books(),
            self.total_members()
        )
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("name", &self.name)
            .field("repository", &self.repository)
            .field("loan_counter", &self.loan_counter)
            .field("default_loan_days", &self.default_loan_days)
            .finish_non_exhaustive()
    }
}
