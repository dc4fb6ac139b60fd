//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery, BookShort},
};

const STATUS_SUCCESS: &str = "success";

/// Id of a newly created book
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateBookResponse {
    pub status: String,
    pub message: String,
    pub data: BookIdData,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookShort>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookListResponse {
    pub status: String,
    pub data: BookListData,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookDetailResponse {
    pub status: String,
    pub data: BookData,
}

/// Success response carrying only a message
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    fn success(message: &str) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.to_string(),
        }
    }
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = CreateBookResponse),
        (status = 400, description = "Missing name or readPage above pageCount", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<(StatusCode, Json<CreateBookResponse>)> {
    let book_id = state.services.books.create(&data)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookResponse {
            status: STATUS_SUCCESS.to_string(),
            message: "Buku berhasil ditambahkan".to_string(),
            data: BookIdData { book_id },
        }),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> AppResult<Json<BookListResponse>> {
    let query: BookQuery = pairs.into_iter().collect();
    let books = state.services.books.list(&query)?;

    Ok(Json(BookListResponse {
        status: STATUS_SUCCESS.to_string(),
        data: BookListData { books },
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetailResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetailResponse>> {
    let book = state.services.books.get_by_id(&id)?;

    Ok(Json(BookDetailResponse {
        status: STATUS_SUCCESS.to_string(),
        data: BookData { book },
    }))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing name or readPage above pageCount", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(data), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.update(&id, &data)?;
    Ok(Json(MessageResponse::success("Buku berhasil diperbarui")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(&id)?;
    Ok(Json(MessageResponse::success("Buku berhasil dihapus")))
}
