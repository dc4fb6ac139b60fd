//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Stored book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub year: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub author: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
    /// Total number of pages
    pub page_count: u64,
    /// Pages read so far, never above `page_count`
    pub read_page: u64,
    /// True iff `read_page == page_count`
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from validated fields.
    pub fn from_fields(id: String, fields: BookFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            finished: fields.read_page == fields.page_count,
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            reading: fields.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Build the full replacement of this record.
    ///
    /// Only `id` and `inserted_at` survive; every mutable field comes from
    /// `fields`. `updated_at` never moves backwards, even if the wall clock does.
    pub fn replaced_by(&self, fields: BookFields, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now.max(self.updated_at),
            inserted_at: self.inserted_at,
            ..Self::from_fields(self.id.clone(), fields, now)
        }
    }

    /// Check a record against a list filter
    pub fn matches(&self, filter: &BookFilter) -> bool {
        if let Some(ref needle) = filter.name {
            if !self.name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if filter.reading.is_some_and(|reading| reading != self.reading) {
            return false;
        }
        if filter.finished.is_some_and(|finished| finished != self.finished) {
            return false;
        }
        true
    }
}

/// Book summary returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update book request, as received.
///
/// Every field is kept as raw JSON so that any body object reaches
/// validation; shape errors are reported by the service in its own order.
/// `finished`, `id` and the timestamps are ignored if a client sends them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub year: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub summary: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
    #[schema(value_type = Option<u64>)]
    pub page_count: Option<Value>,
    #[schema(value_type = Option<u64>)]
    pub read_page: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub reading: Option<Value>,
}

/// Validated mutable fields of a book
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFields {
    pub name: String,
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    pub page_count: u64,
    pub read_page: u64,
    pub reading: bool,
}

/// Book list query parameters.
///
/// Built from the raw query pairs; when a key repeats, the last value wins.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// "1" for books being read, "0" for the others
    pub reading: Option<String>,
    /// "1" for finished books, "0" for the others
    pub finished: Option<String>,
}

impl FromIterator<(String, String)> for BookQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = BookQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => query.name = Some(value),
                "reading" => query.reading = Some(value),
                "finished" => query.finished = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Parsed list filter. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    /// Lowercased name fragment
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            name: query.name.as_deref().map(str::to_lowercase),
            reading: query.reading.as_deref().and_then(parse_flag),
            finished: query.finished.as_deref().and_then(parse_flag),
        }
    }
}

/// Parse a "0"/"1" query flag. Anything else means "no filter".
pub fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}
