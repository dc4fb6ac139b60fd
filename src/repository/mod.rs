//! Repository layer over the in-memory book collection

pub mod books;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

/// Main repository struct holding the shared book collection.
///
/// Cloning is cheap and every clone sees the same collection. All access goes
/// through a single mutex held for the whole operation.
#[derive(Clone, Default)]
pub struct Repository {
    books: Arc<Mutex<Vec<Book>>>,
}

impl Repository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_books(&self) -> AppResult<MutexGuard<'_, Vec<Book>>> {
        self.books
            .lock()
            .map_err(|_| AppError::Internal("Book collection lock poisoned".to_string()))
    }
}
