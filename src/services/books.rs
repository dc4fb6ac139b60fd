//! Book management service

use chrono::Utc;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFields, BookFilter, BookPayload, BookQuery, BookShort},
    repository::Repository,
};

/// Operation a payload is validated for; selects the client-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Update,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Create => "Gagal menambahkan buku",
            Operation::Update => "Gagal memperbarui buku",
        }
    }
}

/// Read a page counter: absent or null means 0, otherwise a non-negative integer.
fn page_number(value: Option<&Value>) -> Option<u64> {
    match value {
        None | Some(Value::Null) => Some(0),
        Some(value) => value.as_u64(),
    }
}

/// Check a payload and build the validated fields.
///
/// The name check always runs first, so a nameless body is reported as such
/// whatever the other fields hold. Page shape, page order and the `reading`
/// flag are checked next, in that order.
fn validate(data: &BookPayload, op: Operation) -> AppResult<BookFields> {
    let name = match data.name.as_ref() {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => {
            return Err(AppError::Validation(format!(
                "{}. Mohon isi nama buku",
                op.failure_prefix()
            )))
        }
    };

    let (Some(page_count), Some(read_page)) = (
        page_number(data.page_count.as_ref()),
        page_number(data.read_page.as_ref()),
    ) else {
        return Err(AppError::Validation(format!(
            "{}. pageCount dan readPage harus berupa bilangan bulat non-negatif",
            op.failure_prefix()
        )));
    };

    if read_page > page_count {
        return Err(AppError::Validation(format!(
            "{}. readPage tidak boleh lebih besar dari pageCount",
            op.failure_prefix()
        )));
    }

    let reading = match data.reading.as_ref() {
        None | Some(Value::Null) => false,
        Some(Value::Bool(reading)) => *reading,
        Some(_) => {
            return Err(AppError::Validation(format!(
                "{}. reading harus berupa boolean",
                op.failure_prefix()
            )))
        }
    };

    Ok(BookFields {
        name,
        year: data.year.clone(),
        author: data.author.clone(),
        summary: data.summary.clone(),
        publisher: data.publisher.clone(),
        page_count,
        read_page,
        reading,
    })
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book and return its generated id
    pub fn create(&self, data: &BookPayload) -> AppResult<String> {
        let fields = validate(data, Operation::Create)?;
        let now = Utc::now();

        let id = self
            .repository
            .books_insert(|id| Book::from_fields(id, fields, now))?;

        tracing::info!("Book created: id={}", id);
        Ok(id)
    }

    /// List book summaries matching the query
    pub fn list(&self, query: &BookQuery) -> AppResult<Vec<BookShort>> {
        let filter = BookFilter::from(query);
        let books = self.repository.books_list(&filter)?;
        tracing::debug!("Listed {} books with filter {:?}", books.len(), filter);
        Ok(books)
    }

    /// Get a full book record
    pub fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books_get_by_id(id)?
            .ok_or_else(|| AppError::NotFound("Buku tidak ditemukan".to_string()))
    }

    /// Replace every mutable field of a book.
    ///
    /// An unknown id is reported before any payload validation.
    pub fn update(&self, id: &str, data: &BookPayload) -> AppResult<Book> {
        let updated = self
            .repository
            .books_replace(id, |existing| {
                let fields = validate(data, Operation::Update)?;
                Ok(existing.replaced_by(fields, Utc::now()))
            })?
            .ok_or_else(|| {
                AppError::NotFound("Gagal memperbarui buku. Id tidak ditemukan".to_string())
            })?;

        tracing::info!("Book updated: id={}", id);
        Ok(updated)
    }

    /// Delete a book
    pub fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.books_delete(id)? {
            return Err(AppError::NotFound(
                "Buku gagal dihapus. Id tidak ditemukan".to_string(),
            ));
        }
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }
}
