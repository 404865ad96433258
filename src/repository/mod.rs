//! In-memory stores for catalog, members and loans
//!
//! Every store keeps insertion order, which is the order listings and searches
//! return. Stores do no cross-entity checks; that is the library service's job.

pub mod books;
pub mod loans;
pub mod members;

/// All stores owned by one library
#[derive(Debug, Default, Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }
}
