//! Book domain methods on Repository

use rand::Rng;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Book, BookFilter, BookShort},
};

/// URL-safe alphabet for book ids
const ID_ALPHABET: &[u8; 64] =
    b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// 21 symbols of 6 bits each: 126 bits of entropy
const ID_LEN: usize = 21;

/// Generate a random book id from the thread-local CSPRNG
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

impl Repository {
    /// Append a new book built from a freshly generated id. Returns the id.
    pub fn books_insert<F>(&self, build: F) -> AppResult<String>
    where
        F: FnOnce(String) -> Book,
    {
        let mut books = self.lock_books()?;

        let mut id = generate_id();
        while books.iter().any(|book| book.id == id) {
            id = generate_id();
        }

        let book = build(id.clone());
        books.push(book);
        Ok(id)
    }

    /// List book summaries matching the filter, in insertion order
    pub fn books_list(&self, filter: &BookFilter) -> AppResult<Vec<BookShort>> {
        let books = self.lock_books()?;
        Ok(books
            .iter()
            .filter(|book| book.matches(filter))
            .map(BookShort::from)
            .collect())
    }

    /// Get a full book record by id
    pub fn books_get_by_id(&self, id: &str) -> AppResult<Option<Book>> {
        let books = self.lock_books()?;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    /// Replace a book in place.
    ///
    /// `replace` receives the current record and returns its full
    /// replacement, or an error that leaves the collection untouched.
    /// Returns `None` if no book has this id.
    pub fn books_replace<F>(&self, id: &str, replace: F) -> AppResult<Option<Book>>
    where
        F: FnOnce(&Book) -> AppResult<Book>,
    {
        let mut books = self.lock_books()?;

        let Some(slot) = books.iter_mut().find(|book| book.id == id) else {
            return Ok(None);
        };

        let replacement = replace(slot)?;
        *slot = replacement.clone();
        Ok(Some(replacement))
    }

    /// Delete a book. Returns true if the book existed and was removed.
    pub fn books_delete(&self, id: &str) -> AppResult<bool> {
        let mut books = self.lock_books()?;
        match books.iter().position(|book| book.id == id) {
            Some(index) => {
                books.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of stored books
    pub fn books_count(&self) -> AppResult<usize> {
        Ok(self.lock_books()?.len())
    }
}
