//! Bulk loading of books and members, e.g. from a JSON seed file

use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{
        book::{Book, NewBook},
        member::{Member, NewMember},
    },
    services::library::Library,
};

/// Books and members to register in one go
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub books: Vec<NewBook>,
    #[serde(default)]
    pub members: Vec<NewMember>,
}

impl SeedData {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Register everything into `library`. Members without an explicit limit
    /// get `default_loan_limit`. Stops at the first invalid or duplicate entry.
    pub fn apply(self, library: &mut Library, default_loan_limit: u32) -> AppResult<()> {
        let (books, members) = (self.books.len(), self.members.len());

        for request in self.books {
            library.add_book(Book::new(request)?)?;
        }
        for mut request in self.members {
            request.loan_limit = request.loan_limit.or(Some(default_loan_limit));
            library.register_member(Member::new(request)?)?;
        }

        tracing::info!("Seed: loaded {} books and {} members", books, members);
        Ok(())
    }
}
