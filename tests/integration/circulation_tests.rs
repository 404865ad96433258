//! Circulation workflow integration tests

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use circulation_desk::{
    AppError, Book, Clock, Library, LibraryStats, LoanStatus, Member, NewBook, NewMember,
};

/// Clock the tests can move forward by hand
#[derive(Clone)]
struct TestClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl TestClock {
    fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap())),
        }
    }

    fn advance(&self, days: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::days(days);
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

fn book(isbn: &str, title: &str, author: &str) -> Book {
    Book::new(NewBook::new(isbn, title, author)).unwrap()
}

fn member(id: &str, name: &str, limit: u32) -> Member {
    Member::new(NewMember::new(id, name).loan_limit(limit)).unwrap()
}

/// Four books and three members
fn desk(clock: &TestClock) -> Library {
    let mut library = Library::with_clock("Central Library", Arc::new(clock.clone()));
    library.add_book(book("978-0-13-468599-1", "Clean Architecture", "Robert C. Martin")).unwrap();
    library.add_book(book("978-0-13-235088-4", "Clean Code", "Robert C. Martin")).unwrap();
    library.add_book(book("978-0-201-63361-0", "Design Patterns", "Gang of Four")).unwrap();
    library.add_book(book("978-0-13-475759-9", "Refactoring", "Martin Fowler")).unwrap();
    library.register_member(member("U001", "Ana Garcia", 3)).unwrap();
    library.register_member(member("U002", "Carlos Lopez", 2)).unwrap();
    library.register_member(member("U003", "Maria Rodriguez", 3)).unwrap();
    library
}

/// Cross-entity invariants that must hold after every operation
fn assert_consistent(library: &Library) {
    let active = library.active_loans();
    for book in library.search_books_by_title("") {
        let open = active.iter().filter(|l| l.book_isbn() == book.isbn()).count();
        assert!(open <= 1, "{} has {} active loans", book.isbn(), open);
        assert_eq!(book.is_available(), open == 0, "availability of {}", book.isbn());
    }
    for loan in &active {
        let holder = library.find_member(loan.member_id()).unwrap();
        assert!(holder.holds(loan.book_isbn()));
    }
    for id in ["U001", "U002", "U003"] {
        if let Some(m) = library.find_member(id) {
            assert!(m.loan_count() <= m.loan_limit() as usize);
            let mut held = m.held_books().to_vec();
            held.sort();
            held.dedup();
            assert_eq!(held.len(), m.loan_count());
        }
    }
}

#[test]
fn test_add_book_then_duplicate() {
    let mut library = Library::new("Empty");
    library.add_book(book("978-1", "T1", "A1")).unwrap();
    assert_eq!(library.total_books(), 1);

    let err = library.add_book(book("978-1", "Another title", "A2")).unwrap_err();
    assert!(matches!(err, AppError::DuplicateBook(isbn) if isbn == "978-1"));
    assert_eq!(library.total_books(), 1);
    assert_eq!(library.find_book_by_isbn("978-1").unwrap().title(), "T1");
}

#[test]
fn test_register_duplicate_member() {
    let mut library = Library::new("Empty");
    library.register_member(member("U1", "Ana", 3)).unwrap();
    let err = library.register_member(member("U1", "Other", 1)).unwrap_err();
    assert!(matches!(err, AppError::DuplicateMember(_)));
    assert_eq!(library.total_members(), 1);
    assert_eq!(library.find_member("U1").unwrap().name(), "Ana");
}

#[test]
fn test_lend_creates_active_loan() {
    let clock = TestClock::new();
    let mut library = Library::with_clock("Central", Arc::new(clock.clone()));
    library.register_member(Member::new(NewMember::new("U1", "Ana")).unwrap()).unwrap();
    library.add_book(book("ISBN-1", "T1", "A1")).unwrap();

    let loan = library.lend_book("ISBN-1", "U1").unwrap();
    assert_eq!(loan.id(), "LOAN-00001");
    assert_eq!(loan.book_isbn(), "ISBN-1");
    assert_eq!(loan.member_id(), "U1");
    assert!(loan.is_active());
    assert_eq!(loan.duration_days(), 14);
    assert!(!library.find_book_by_isbn("ISBN-1").unwrap().is_available());
    assert_eq!(library.find_member("U1").unwrap().held_books(), ["ISBN-1"]);
    assert_eq!(library.find_loan("LOAN-00001").unwrap().status(), LoanStatus::Active);
    assert_consistent(&library);
}

#[test]
fn test_loan_ids_are_sequential() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    let ids: Vec<_> = [
        ("978-0-13-468599-1", "U001"),
        ("978-0-13-235088-4", "U002"),
        ("978-0-201-63361-0", "U003"),
    ]
    .into_iter()
    .map(|(isbn, id)| library.lend_book(isbn, id).unwrap().id().to_string())
    .collect();
    assert_eq!(ids, ["LOAN-00001", "LOAN-00002", "LOAN-00003"]);

    // Each library counts on its own
    let mut other = desk(&clock);
    assert_eq!(
        other.lend_book("978-0-13-475759-9", "U001").unwrap().id(),
        "LOAN-00001"
    );
}

#[test]
fn test_lend_failures_leave_state_untouched() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    library.lend_book("978-0-13-468599-1", "U001").unwrap();
    let before = library.stats();

    assert!(matches!(
        library.lend_book("000-0", "U001"),
        Err(AppError::BookNotFound(_))
    ));
    assert!(matches!(
        library.lend_book("978-0-13-468599-1", "U002"),
        Err(AppError::BookUnavailable { .. })
    ));
    assert!(matches!(
        library.lend_book("978-0-13-235088-4", "U999"),
        Err(AppError::MemberNotFound(_))
    ));

    assert_eq!(library.stats(), before);
    assert!(library.find_book_by_isbn("978-0-13-235088-4").unwrap().is_available());
    assert!(library.find_member("U002").unwrap().held_books().is_empty());

    let next = library.lend_book("978-0-13-235088-4", "U002").unwrap();
    assert_eq!(next.id(), "LOAN-00002");
    assert_consistent(&library);
}

#[test]
fn test_lend_checks_book_before_member() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    let err = library.lend_book("000-0", "U999").unwrap_err();
    assert!(matches!(err, AppError::BookNotFound(_)));
}

#[test]
fn test_loan_limit_of_one() {
    let clock = TestClock::new();
    let mut library = Library::with_clock("Central", Arc::new(clock.clone()));
    library.add_book(book("ISBN-1", "T1", "A1")).unwrap();
    library.add_book(book("ISBN-2", "T2", "A2")).unwrap();
    library.register_member(member("U1", "Ana", 1)).unwrap();

    library.lend_book("ISBN-1", "U1").unwrap();
    let err = library.lend_book("ISBN-2", "U1").unwrap_err();
    assert!(matches!(err, AppError::LoanLimitReached { limit: 1, .. }));
    assert!(library.find_book_by_isbn("ISBN-2").unwrap().is_available());

    library.return_book("ISBN-1", "U1").unwrap();
    let loan = library.lend_book("ISBN-2", "U1").unwrap();
    assert_eq!(loan.book_isbn(), "ISBN-2");
    assert_consistent(&library);
}

#[test]
fn test_member_limit_blocks_third_loan() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    library.lend_book("978-0-13-468599-1", "U002").unwrap();
    library.lend_book("978-0-13-235088-4", "U002").unwrap();

    assert!(matches!(
        library.lend_book("978-0-201-63361-0", "U002"),
        Err(AppError::LoanLimitReached { .. })
    ));

    library.return_book("978-0-13-468599-1", "U002").unwrap();
    assert!(library.lend_book("978-0-201-63361-0", "U002").is_ok());
    assert_consistent(&library);
}

#[test]
fn test_lend_and_return_round_trip() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    let isbn = "978-0-13-468599-1";

    library.lend_book(isbn, "U001").unwrap();
    assert_eq!(library.available_books().len(), 3);

    clock.advance(4);
    let closed = library.return_book(isbn, "U001").unwrap();
    assert_eq!(closed.status(), LoanStatus::Returned);
    assert_eq!(closed.elapsed_days(clock.now()), 4);

    assert!(library.find_book_by_isbn(isbn).unwrap().is_available());
    assert!(!library.find_member("U001").unwrap().holds(isbn));
    assert_eq!(library.available_books().len(), 4);
    assert!(library.active_loans().is_empty());
    assert_eq!(library.total_loans(), 1);
    assert_consistent(&library);
}

#[test]
fn test_return_without_active_loan() {
    let clock = TestClock::new();
    let mut library = desk(&clock);

    assert!(matches!(
        library.return_book("978-0-13-468599-1", "U001"),
        Err(AppError::LoanNotFound { .. })
    ));

    library.lend_book("978-0-13-468599-1", "U001").unwrap();
    // Wrong member
    assert!(matches!(
        library.return_book("978-0-13-468599-1", "U002"),
        Err(AppError::LoanNotFound { .. })
    ));

    library.return_book("978-0-13-468599-1", "U001").unwrap();
    // Returned twice
    assert!(matches!(
        library.return_book("978-0-13-468599-1", "U001"),
        Err(AppError::LoanNotFound { .. })
    ));
    assert_consistent(&library);
}

#[test]
fn test_search_by_title() {
    let clock = TestClock::new();
    let library = desk(&clock);

    let all: Vec<_> = library.search_books_by_title("").iter().map(|b| b.isbn()).collect();
    assert_eq!(
        all,
        [
            "978-0-13-468599-1",
            "978-0-13-235088-4",
            "978-0-201-63361-0",
            "978-0-13-475759-9"
        ]
    );

    for (term, expected) in [("Clean", 2), ("design", 1), ("Python", 0), ("REFACTORING", 1)] {
        assert_eq!(library.search_books_by_title(term).len(), expected, "term {term}");
    }
}

#[test]
fn test_search_by_author_then_lend() {
    let clock = TestClock::new();
    let mut library = desk(&clock);

    for (term, expected) in [("Robert C. Martin", 2), ("martin", 3), ("Gang of Four", 1), ("Nobody", 0)] {
        assert_eq!(library.search_books_by_author(term).len(), expected, "term {term}");
    }

    let isbns: Vec<String> = library
        .search_books_by_author("Robert C. Martin")
        .iter()
        .map(|b| b.isbn().to_string())
        .collect();
    library.lend_book(&isbns[0], "U001").unwrap();
    library.lend_book(&isbns[1], "U002").unwrap();

    assert!(library
        .search_books_by_author("Robert C. Martin")
        .iter()
        .all(|b| !b.is_available()));
    assert_consistent(&library);
}

#[test]
fn test_loan_listings() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    library.lend_book("978-0-13-468599-1", "U001").unwrap();
    library.lend_book("978-0-13-235088-4", "U002").unwrap();
    library.lend_book("978-0-201-63361-0", "U001").unwrap();
    library.return_book("978-0-13-468599-1", "U001").unwrap();

    let active: Vec<_> = library.active_loans().iter().map(|l| l.id()).collect();
    assert_eq!(active, ["LOAN-00002", "LOAN-00003"]);

    let for_ana: Vec<_> = library.loans_for_member("U001").iter().map(|l| l.id()).collect();
    assert_eq!(for_ana, ["LOAN-00001", "LOAN-00003"]);
    assert!(library.loans_for_member("U003").is_empty());
}

#[test]
fn test_overdue_loans() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    library.lend_book_for("978-0-13-468599-1", "U001", 7).unwrap();
    library.lend_book("978-0-13-235088-4", "U002").unwrap();

    clock.advance(7);
    assert!(library.overdue_loans().is_empty());

    clock.advance(1);
    let overdue = library.overdue_loans();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].book_isbn(), "978-0-13-468599-1");
    assert_eq!(overdue[0].remaining_days(clock.now()), -1);

    clock.advance(7);
    assert_eq!(library.overdue_loans().len(), 2);

    library.return_book("978-0-13-468599-1", "U001").unwrap();
    assert_eq!(library.overdue_loans().len(), 1);
}

#[test]
fn test_stats_after_lending_one_of_two() {
    let clock = TestClock::new();
    let mut library = Library::with_clock("Central", Arc::new(clock.clone()));
    library.add_book(book("ISBN-1", "T1", "A1")).unwrap();
    library.add_book(book("ISBN-2", "T2", "A2")).unwrap();
    library.register_member(member("U1", "Ana", 3)).unwrap();
    library.lend_book("ISBN-1", "U1").unwrap();

    assert_eq!(
        library.stats(),
        LibraryStats {
            total_books: 2,
            available_books: 1,
            loaned_books: 1,
            total_members: 1,
            total_loans: 1,
            active_loans: 1,
            overdue_loans: 0,
        }
    );
}

#[test]
fn test_stats_full_session() {
    let clock = TestClock::new();
    let mut library = desk(&clock);
    assert_eq!(
        library.stats(),
        LibraryStats {
            total_books: 4,
            available_books: 4,
            total_members: 3,
            ..LibraryStats::default()
        }
    );

    library.lend_book("978-0-13-468599-1", "U001").unwrap();
    library.lend_book("978-0-13-235088-4", "U002").unwrap();
    library.return_book("978-0-13-468599-1", "U001").unwrap();

    let stats = library.stats();
    assert_eq!(stats.total_books, 4);
    assert_eq!(stats.available_books, 3);
    assert_eq!(stats.loaned_books, 1);
    assert_eq!(stats.total_members, 3);
    assert_eq!(stats.total_loans, 2);
    assert_eq!(stats.active_loans, 1);

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["loaned_books"], 1);
}
