//! Loan ledger keyed by loan ID

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::models::loan::Loan;

#[derive(Debug, Default, Clone)]
pub struct LoansRepository {
    loans: IndexMap<String, Loan>,
}

impl LoansRepository {
    pub fn insert(&mut self, loan: Loan) {
        self.loans.insert(loan.id().to_string(), loan);
    }

    pub fn get(&self, id: &str) -> Option<&Loan> {
        self.loans.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Loan> {
        self.loans.get_mut(id)
    }

    /// The open loan of `isbn` to `member_id`, if any
    pub fn find_active(&self, isbn: &str, member_id: &str) -> Option<&Loan> {
        self.loans.values().find(|loan| {
            loan.book_isbn() == isbn && loan.member_id() == member_id && loan.is_active()
        })
    }

    pub fn active(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values().filter(|loan| loan.is_active())
    }

    pub fn overdue(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Loan> {
        self.loans.values().filter(move |loan| loan.is_overdue(now))
    }

    pub fn for_member(&self, member_id: &str) -> Vec<&Loan> {
        self.loans
            .values()
            .filter(|loan| loan.member_id() == member_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}
