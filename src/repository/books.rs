//! Catalog store keyed by ISBN

use indexmap::IndexMap;

use crate::models::book::Book;

#[derive(Debug, Default, Clone)]
pub struct BooksRepository {
    books: IndexMap<String, Book>,
}

impl BooksRepository {
    pub fn contains(&self, isbn: &str) -> bool {
        self.books.contains_key(isbn)
    }

    /// Callers check `contains` first; an existing entry would be overwritten
    pub fn insert(&mut self, book: Book) {
        self.books.insert(book.isbn().to_string(), book);
    }

    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn get_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Books whose field (as picked by `field`) contains `needle`, ignoring case
    pub fn search_by<F>(&self, needle: &str, field: F) -> Vec<&Book>
    where
        F: Fn(&Book) -> &str,
    {
        let needle = needle.to_lowercase();
        self.books
            .values()
            .filter(|book| field(*book).to_lowercase().contains(&needle))
            .collect()
    }

    pub fn count_available(&self) -> usize {
        self.books.values().filter(|b| b.is_available()).count()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
