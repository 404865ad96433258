//! Aggregate counts over the whole library

use serde::{Deserialize, Serialize};

/// Snapshot of catalog, membership and loan counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_books: usize,
    pub available_books: usize,
    pub loaned_books: usize,
    pub total_members: usize,
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
}
